use std::fmt::Debug;
use std::sync::Arc;

use wiring::injector::Construct;
use wiring::prelude::*;

pub trait Wheel: Debug + Send + Sync + 'static {}

#[derive(Debug)]
pub struct Tyre;

impl Wheel for Tyre {}

#[derive(Debug)]
pub struct Axle {
    pub left: Arc<Tyre>,
    pub right: Arc<Tyre>,
}

#[constructor]
impl Axle {
    #[inject]
    pub fn new(left: Arc<Tyre>, right: Arc<Tyre>) -> Self {
        Self { left, right }
    }

    pub fn width(&self) -> usize {
        2
    }
}

#[constructor(Box<dyn Wheel>, Box::new)]
impl Tyre {
    #[inject]
    fn new() -> Self {
        Self
    }
}

fn assert_construct<C: Construct>() {}

fn main() {
    assert_construct::<Axle>();
    assert_construct::<Tyre>();
}
