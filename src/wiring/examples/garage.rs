use std::convert::Infallible;
use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wiring::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
                .add_directive("wiring=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let container = Container::init(GarageModule::new("garage"))?;
    let garage = container.resolve::<Garage>(&Reference::singleton::<Garage>("Default"))?;
    garage.run();
    Ok(())
}

struct GarageModule {
    name: &'static str,
}

impl GarageModule {
    fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Module for GarageModule {
    fn configure(
        &self,
        configurer: &mut dyn Configurer,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        bind::<String>()
            .named("GarageName")
            .singleton()
            .to_instance(self.name.to_string())
            .set_on(configurer);

        bind::<Box<dyn Logger>>()
            .singleton()
            .to_constructor::<ConsoleLogger, _>([Argument::from(Reference::singleton::<String>(
                "GarageName",
            ))])
            .set_on(configurer);

        bind::<Box<dyn Vehicle>>()
            .named("Petrol")
            .to_constructor::<PetrolCar, _>([Argument::from(logger())])
            .set_on(configurer);

        bind::<Box<dyn Vehicle>>()
            .named("Electric")
            .to_callback(
                |logger: Arc<Box<dyn Logger>>| {
                    Ok::<_, Infallible>(Box::new(ElectricCar { logger }) as Box<dyn Vehicle>)
                },
                [Argument::from(logger())],
            )
            .set_on(configurer);

        bind::<Garage>()
            .singleton()
            .to_constructor::<Garage, _>([
                Argument::from(logger()),
                Argument::from(Reference::transient::<Box<dyn Vehicle>>("Petrol")),
                Argument::from(Reference::transient::<Box<dyn Vehicle>>("Electric")),
            ])
            .set_on(configurer);

        Ok(())
    }
}

fn logger() -> Reference {
    Reference::singleton::<Box<dyn Logger>>("Default")
}

trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);
}

struct ConsoleLogger {
    name: Arc<String>,
}

#[constructor(Box<dyn Logger>, Box::new)]
impl ConsoleLogger {
    #[inject]
    fn new(name: Arc<String>) -> Self {
        Self { name }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("[{}] {}", self.name, message);
    }
}

trait Vehicle: Send + Sync + 'static {
    fn start(&self);
}

struct PetrolCar {
    logger: Arc<Box<dyn Logger>>,
}

#[constructor(Box<dyn Vehicle>, Box::new)]
impl PetrolCar {
    #[inject]
    fn new(logger: Arc<Box<dyn Logger>>) -> Self {
        Self { logger }
    }
}

impl Vehicle for PetrolCar {
    fn start(&self) {
        self.logger.log("Vroom!");
    }
}

struct ElectricCar {
    logger: Arc<Box<dyn Logger>>,
}

impl Vehicle for ElectricCar {
    fn start(&self) {
        self.logger.log("Whirr.");
    }
}

struct Garage {
    logger: Arc<Box<dyn Logger>>,
    vehicles: Vec<Arc<Box<dyn Vehicle>>>,
}

#[constructor]
impl Garage {
    #[inject]
    fn new(
        logger: Arc<Box<dyn Logger>>,
        petrol: Arc<Box<dyn Vehicle>>,
        electric: Arc<Box<dyn Vehicle>>,
    ) -> Self {
        Self {
            logger,
            vehicles: vec![petrol, electric],
        }
    }

    fn run(&self) {
        self.logger.log("Starting every vehicle managed by the container:");
        for vehicle in &self.vehicles {
            vehicle.start();
        }
    }
}
