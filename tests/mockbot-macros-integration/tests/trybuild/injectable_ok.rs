use mockbot::{mockable, AutoMockKernel, Injectable};
use std::sync::Arc;

#[mockable]
pub trait Clock {
    fn now(&self) -> u64;
}

#[derive(Injectable)]
struct Unit;

#[derive(Injectable)]
struct Wrapper(Arc<dyn Clock>, Option<Arc<Unit>>);

#[derive(Injectable)]
struct Scheduler {
    clock: Arc<dyn Clock>,
    wrapper: Arc<Wrapper>,
    #[inject(default)]
    ticks: Vec<u64>,
}

fn main() {
    let kernel = AutoMockKernel::new();
    let scheduler = kernel.get::<Scheduler>().unwrap();
    assert_eq!(scheduler.clock.now(), 0);
    assert!(scheduler.wrapper.1.is_some());
    assert!(scheduler.ticks.is_empty());
    kernel.dispose().unwrap();
}
