use std::cell::Cell;
use std::rc::Rc;

use lazy_value::LazyValue;

#[test]
fn test_new_is_not_initialized() {
   let cell: LazyValue<i32> = LazyValue::new(|| 42);
   assert!(!cell.is_initialized());
   assert_eq!(cell.peek(), None);
}

#[test]
fn test_with_value_is_initialized() {
   let cell = LazyValue::with_value(7, || -> i32 { panic!("producer must not run") });
   assert!(cell.is_initialized());
   assert_eq!(cell.get(), &7);
}

#[test]
fn test_hello_scenario() {
   let calls = Cell::new(0);
   let cell: LazyValue<&str, _> = LazyValue::new(|| {
      calls.set(calls.get() + 1);
      "hello"
   });
   assert!(!cell.is_initialized());

   assert_eq!(*cell.get(), "hello");
   assert_eq!(calls.get(), 1);

   assert_eq!(*cell.get(), "hello");
   assert_eq!(calls.get(), 1);
   assert!(cell.is_initialized());
}

#[test]
fn test_many_reads_share_one_value() {
   let calls = Cell::new(0);
   let cell: LazyValue<Vec<i32>, _> = LazyValue::new(|| {
      calls.set(calls.get() + 1);
      vec![1, 2, 3]
   });

   let first = cell.get();
   for _ in 0..10 {
      // Same allocation every time, not just an equal value.
      assert!(std::ptr::eq(first, cell.get()));
   }
   assert_eq!(first, &vec![1, 2, 3]);
   assert_eq!(calls.get(), 1);
}

#[test]
fn test_deref_produces_once() {
   let calls = Cell::new(0);
   let cell: LazyValue<String, _> = LazyValue::new(|| {
      calls.set(calls.get() + 1);
      String::from("label")
   });

   assert_eq!(cell.len(), 5);
   assert!(cell.starts_with("lab"));
   assert_eq!(calls.get(), 1);
}

#[test]
fn test_set_before_get_skips_producer() {
   let calls = Cell::new(0);
   let mut cell = LazyValue::new(|| {
      calls.set(calls.get() + 1);
      1
   });

   assert_eq!(cell.set(5), None);
   assert!(cell.is_initialized());
   assert_eq!(cell.get(), &5);
   assert_eq!(calls.get(), 0);
}

#[test]
fn test_set_after_get_replaces() {
   let calls = Cell::new(0);
   let mut cell = LazyValue::new(|| {
      calls.set(calls.get() + 1);
      1
   });

   assert_eq!(cell.get(), &1);
   assert_eq!(cell.set(2), Some(1));
   assert_eq!(cell.get(), &2);
   assert!(cell.is_initialized());
   assert_eq!(calls.get(), 1);
}

#[test]
fn test_try_get_retries_after_failure() {
   let calls = Cell::new(0);
   let cell: LazyValue<String, _> = LazyValue::new(|| {
      calls.set(calls.get() + 1);
      if calls.get() == 1 {
         Err("missing")
      } else {
         Ok(String::from("found"))
      }
   });

   assert_eq!(cell.try_get(), Err("missing"));
   assert!(!cell.is_initialized());
   assert_eq!(calls.get(), 1);

   assert_eq!(cell.try_get().map(String::as_str), Ok("found"));
   assert!(cell.is_initialized());
   assert_eq!(calls.get(), 2);

   // Initialized now, so the producer stays idle.
   assert_eq!(cell.try_get().map(String::as_str), Ok("found"));
   assert_eq!(calls.get(), 2);
}

#[test]
fn test_try_get_after_set() {
   let mut cell: LazyValue<i32, _> = LazyValue::new(|| Err::<i32, _>("unreachable"));
   cell.set(3);
   assert_eq!(cell.try_get(), Ok(&3));
}

#[test]
fn test_peek_mut_and_into_inner() {
   let mut cell: LazyValue<String, _> = LazyValue::new(|| String::from("a"));
   assert_eq!(cell.peek_mut(), None);

   cell.get();
   if let Some(value) = cell.peek_mut() {
      value.push('b');
   }
   assert_eq!(cell.peek().map(String::as_str), Some("ab"));
   assert_eq!(cell.into_inner(), Some(String::from("ab")));

   let untouched: LazyValue<String, _> = LazyValue::new(|| String::from("never"));
   assert_eq!(untouched.into_inner(), None);
}

#[test]
fn test_default_uses_type_default() {
   let cell: LazyValue<Vec<u8>> = LazyValue::default();
   assert!(!cell.is_initialized());
   assert!(cell.get().is_empty());
   assert!(cell.is_initialized());
}

#[test]
fn test_debug() {
   let cell: LazyValue<i32, _> = LazyValue::new(|| 9);
   assert_eq!(format!("{cell:?}"), "LazyValue(<uninit>)");
   cell.get();
   assert_eq!(format!("{cell:?}"), "LazyValue(9)");
}

#[test]
fn test_drop_releases_value_and_producer() {
   let captured = Rc::new(());
   let value = Rc::new(10u32);

   {
      let producer_ref = Rc::clone(&captured);
      let value_ref = Rc::clone(&value);
      let cell: LazyValue<Rc<u32>, _> = LazyValue::new(move || {
         let _keep = &producer_ref;
         Rc::clone(&value_ref)
      });
      cell.get();
      assert_eq!(Rc::strong_count(&captured), 2);
      assert_eq!(Rc::strong_count(&value), 3); // value + value_ref + cell
   }

   assert_eq!(Rc::strong_count(&captured), 1);
   assert_eq!(Rc::strong_count(&value), 1);
}
