use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_value::SyncLazyValue;
use tokio::time::{sleep, Duration};

type DataFuture = Pin<Box<dyn Future<Output = String> + Send>>;

static COUNTER: AtomicUsize = AtomicUsize::new(0);
static ASYNC_DATA: SyncLazyValue<String, fn() -> DataFuture> = SyncLazyValue::new(load_data);

fn load_data() -> DataFuture {
   Box::pin(async {
      COUNTER.fetch_add(1, Ordering::Relaxed);
      println!("Producing async data...");
      sleep(Duration::from_millis(50)).await;
      "Async expensive data".to_string()
   })
}

#[tokio::main]
async fn main() {
   let tasks: Vec<_> = (0..5)
      .map(|_| {
         tokio::spawn(async {
            println!("Task access: {}", ASYNC_DATA.get_async().await);
         })
      })
      .collect();

   for t in tasks {
      t.await.unwrap();
   }

   assert_eq!(ASYNC_DATA.peek(), Some(&"Async expensive data".to_string()));
   assert_eq!(COUNTER.load(Ordering::Relaxed), 1);
   println!("Final async data: {}", ASYNC_DATA.get_async().await);
}
