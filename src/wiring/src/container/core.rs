use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use snafu::prelude::*;
use tracing::{debug, trace};

use crate::config::Config;
use crate::container::stack::{Resolution, ResolutionStack};
use crate::container::{
    BindingSnafu, ContainerOptions, Instance, InjectionSnafu, InvalidDependencySnafu,
    ResolveError, TypeMismatchSnafu,
};
use crate::reference::{Reference, ReferenceId};

pub struct ContainerCore {
    config: Arc<dyn Config>,
    options: ContainerOptions,
    singletons: RwLock<HashMap<ReferenceId, Instance>>,
    resolving: ReentrantMutex<()>,
}

impl ContainerCore {
    pub fn new(config: Arc<dyn Config>, options: ContainerOptions) -> Self {
        Self {
            config,
            options,
            singletons: RwLock::new(HashMap::new()),
            resolving: ReentrantMutex::new(()),
        }
    }

    pub fn options(&self) -> ContainerOptions {
        self.options
    }

    pub fn is_cached(&self, reference: &Reference) -> bool {
        self.singletons.read().contains_key(&reference.id())
    }

    pub fn cached_singletons(&self) -> usize {
        self.singletons.read().len()
    }

    /// Builds the object graph rooted at `reference` depth first, leaves
    /// first, without recursing on the call stack.
    pub fn get(&self, reference: &Reference) -> Result<Instance, ResolveError> {
        let _guard = self.resolving.lock();
        debug!(%reference, "resolving");

        let mut stack = ResolutionStack::new(self.options.max_stack_size());
        stack.push(reference.clone(), None)?;

        while let Some(index) = stack.top() {
            let item = stack.item_mut(index);

            let instance = if let Some(instance) = self.try_get_cached(item.reference()) {
                trace!(reference = %item.reference(), "singleton cache hit");
                instance
            } else {
                if item.resolution().is_none() {
                    let injector = self
                        .config
                        .get_injector(item.reference())
                        .context(BindingSnafu {
                            reference: item.reference().clone(),
                        })?;
                    item.set_resolution(injector);
                }

                if item.is_fulfilled() {
                    let Some(resolution) = item.take_resolution() else {
                        unreachable!("a fulfilled item should own its resolution");
                    };
                    self.build(item.reference(), resolution)?
                } else {
                    stack.expand(index)?;
                    continue;
                }
            };

            let Some(item) = stack.pop() else {
                unreachable!("the inspected item should still be on the stack");
            };
            match item.parent() {
                Some(parent) => self.propagate(&mut stack, parent, item.reference(), instance)?,
                None => {
                    debug!(%reference, "resolved");
                    return Ok(instance);
                }
            }
        }

        unreachable!("the root item should return before the stack is empty")
    }

    fn try_get_cached(&self, reference: &Reference) -> Option<Instance> {
        if !reference.is_singleton() {
            return None;
        }
        self.singletons.read().get(&reference.id()).cloned()
    }

    fn build(&self, reference: &Reference, resolution: Resolution) -> Result<Instance, ResolveError> {
        let Resolution {
            injector,
            dependencies,
        } = resolution;
        let instance = injector.inject(dependencies).context(InjectionSnafu)?;
        trace!(%reference, "built");

        ensure!(
            instance.type_id() == reference.class().type_id(),
            TypeMismatchSnafu {
                reference: reference.clone(),
                expected: reference.class_name(),
                found: instance.type_name(),
            }
        );

        if reference.is_singleton() {
            let mut singletons = self.singletons.write();
            let cached = singletons.entry(reference.id()).or_insert(instance).clone();
            debug!(%reference, "singleton cached");
            Ok(cached)
        } else {
            Ok(instance)
        }
    }

    fn propagate(
        &self,
        stack: &mut ResolutionStack,
        parent: usize,
        reference: &Reference,
        instance: Instance,
    ) -> Result<(), ResolveError> {
        let parent = stack.item_mut(parent);
        let parent_reference = parent.reference().clone();
        let Some(dependencies) = parent.dependencies_mut() else {
            unreachable!("a parent should acquire its injector before pushing children");
        };
        dependencies
            .set_instantiated_dependency(reference, instance)
            .context(InvalidDependencySnafu {
                reference: parent_reference,
            })
    }
}
