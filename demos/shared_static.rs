use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_value::SyncLazyValue;

static COUNTER: AtomicUsize = AtomicUsize::new(0);
static DATA: SyncLazyValue<String> = SyncLazyValue::new(load_data);

fn load_data() -> String {
   COUNTER.fetch_add(1, Ordering::Relaxed);
   println!("Producing data...");
   std::thread::sleep(std::time::Duration::from_millis(50));
   "Expensive data".to_string()
}

fn main() {
   assert!(!DATA.is_initialized());

   let threads: Vec<_> = (0..5)
      .map(|_| {
         std::thread::spawn(|| {
            println!("Thread access: {}", *DATA);
         })
      })
      .collect();

   for t in threads {
      t.join().unwrap();
   }

   assert!(DATA.is_initialized());
   assert_eq!(COUNTER.load(Ordering::Relaxed), 1);
   println!("Final data: {}", DATA.get());
}
