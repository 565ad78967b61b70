//! src/registry.rs
use crate::error::{MapError, ReduceError, SetupError};
use crate::functions::{Emitter, FunctionContext, Mapper, ReduceOutcome, Reducer, Value};

// Object-safe versions of the function traits
pub trait MapperDyn: Send {
    fn name(&self) -> &str;
    fn map(&mut self, key: &str, value: &str, emitter: &mut dyn Emitter) -> Result<(), MapError>;
}

pub trait ReducerDyn: Send + Sync {
    fn name(&self) -> &str;
    fn reduce(
        &self,
        key: &str,
        values: Vec<Value>,
        emitter: &mut dyn Emitter,
    ) -> Result<ReduceOutcome, ReduceError>;
}

impl std::fmt::Debug for dyn MapperDyn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperDyn").field("name", &self.name()).finish()
    }
}

impl std::fmt::Debug for dyn ReducerDyn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducerDyn").field("name", &self.name()).finish()
    }
}

pub struct MapperRegistration {
    pub name: &'static str,
    pub factory: fn(&FunctionContext) -> Box<dyn MapperDyn>,
}

pub struct ReducerRegistration {
    pub name: &'static str,
    pub factory: fn(&FunctionContext) -> Box<dyn ReducerDyn>,
}

inventory::collect!(MapperRegistration);
inventory::collect!(ReducerRegistration);

pub fn get_mapper(name: &str, context: &FunctionContext) -> Result<Box<dyn MapperDyn>, SetupError> {
    inventory::iter::<MapperRegistration>()
        .find(|reg| reg.name == name)
        .map(|reg| (reg.factory)(context))
        .ok_or_else(|| SetupError::UnknownFunction {
            kind: "Mapper",
            name: name.to_string(),
        })
}

// Combiners are registered as reducers
pub fn get_reducer(
    name: &str,
    context: &FunctionContext,
) -> Result<Box<dyn ReducerDyn>, SetupError> {
    inventory::iter::<ReducerRegistration>()
        .find(|reg| reg.name == name)
        .map(|reg| (reg.factory)(context))
        .ok_or_else(|| SetupError::UnknownFunction {
            kind: "Reducer",
            name: name.to_string(),
        })
}

pub fn list_mappers() -> Vec<&'static str> {
    inventory::iter::<MapperRegistration>()
        .map(|reg| reg.name)
        .collect()
}

pub fn list_reducers() -> Vec<&'static str> {
    inventory::iter::<ReducerRegistration>()
        .map(|reg| reg.name)
        .collect()
}

/// Pairs a mapper with the state it carries from one record to the next.
pub struct MapperWrapper<M: Mapper> {
    pub name: &'static str,
    pub inner: M,
    pub state: M::State,
}

impl<M: Mapper + Send> MapperDyn for MapperWrapper<M> {
    fn name(&self) -> &str {
        self.name
    }

    fn map(&mut self, key: &str, value: &str, emitter: &mut dyn Emitter) -> Result<(), MapError> {
        self.inner.map(&mut self.state, key, value, emitter)
    }
}

pub struct ReducerWrapper<R: Reducer> {
    pub name: &'static str,
    pub inner: R,
}

impl<R: Reducer + Send + Sync> ReducerDyn for ReducerWrapper<R> {
    fn name(&self) -> &str {
        self.name
    }

    fn reduce(
        &self,
        key: &str,
        values: Vec<Value>,
        emitter: &mut dyn Emitter,
    ) -> Result<ReduceOutcome, ReduceError> {
        self.inner.reduce(key, values.into_iter(), emitter)
    }
}

#[macro_export]
macro_rules! impl_mapper {
    ($mapper_type:ty, $name:expr) => {
        inventory::submit! {
            $crate::registry::MapperRegistration {
                name: $name,
                factory: |context| {
                    use $crate::functions::Mapper;
                    Box::new($crate::registry::MapperWrapper {
                        name: $name,
                        inner: <$mapper_type>::build(context),
                        state: Default::default(),
                    })
                },
            }
        }
    };
}

#[macro_export]
macro_rules! impl_reducer {
    ($reducer_type:ty, $name:expr) => {
        inventory::submit! {
            $crate::registry::ReducerRegistration {
                name: $name,
                factory: |context| {
                    use $crate::functions::Reducer;
                    Box::new($crate::registry::ReducerWrapper {
                        name: $name,
                        inner: <$reducer_type>::build(context),
                    })
                },
            }
        }
    };
}
