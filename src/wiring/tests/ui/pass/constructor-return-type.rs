use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use wiring::prelude::*;

pub struct Fuel {
    pub litres: u32,
}

#[derive(Debug)]
pub struct EmptyTank;

impl Display for EmptyTank {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("the tank is empty")
    }
}

impl Error for EmptyTank {}

pub struct Pump {
    pub fuel: Arc<Fuel>,
}

#[constructor]
impl Pump {
    #[inject]
    pub fn new(fuel: Arc<Fuel>) -> Result<Self, EmptyTank> {
        if fuel.litres == 0 {
            Err(EmptyTank)
        } else {
            Ok(Self { fuel })
        }
    }
}

pub struct Injection {
    pub pump: Arc<Pump>,
}

#[constructor]
impl Injection {
    #[inject]
    pub fn new(pump: Arc<Pump>) -> core::result::Result<Injection, Box<dyn Error + Send + Sync>> {
        Ok(Injection { pump })
    }
}

pub struct Ignition;

#[constructor]
impl Ignition {
    #[inject]
    fn new(_injection: std::sync::Arc<Injection>, _fuel: Arc<Fuel>) -> Ignition {
        Ignition
    }
}

struct EngineModule {
    litres: u32,
}

impl Module for EngineModule {
    fn configure(
        &self,
        configurer: &mut dyn Configurer,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let fuel = Reference::singleton::<Fuel>("Default");
        let pump = Reference::transient::<Pump>("Default");
        let injection = Reference::transient::<Injection>("Default");

        bind::<Fuel>()
            .singleton()
            .to_instance(Fuel {
                litres: self.litres,
            })
            .set_on(configurer);
        bind::<Pump>()
            .to_constructor::<Pump, _>([Argument::from(fuel.clone())])
            .set_on(configurer);
        bind::<Injection>()
            .to_constructor::<Injection, _>([Argument::from(pump)])
            .set_on(configurer);
        bind::<Ignition>()
            .to_constructor::<Ignition, _>([Argument::from(injection), Argument::from(fuel)])
            .set_on(configurer);
        Ok(())
    }
}

fn main() {
    let ignition = Reference::transient::<Ignition>("Default");

    let container = Container::init(EngineModule { litres: 40 }).unwrap();
    assert!(container.resolve::<Ignition>(&ignition).is_ok());

    let container = Container::init(EngineModule { litres: 0 }).unwrap();
    let err = container.get(&ignition).unwrap_err();
    assert!(err.to_string().contains("Pump"));
}
