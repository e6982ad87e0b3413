//! Scene object classification and construction by name.

use crate::props::{PropertyError, PropertyList};
use std::{
    any::Any,
    collections::HashMap,
    fmt::{Debug, Display, Formatter},
};

/// Kinds of objects a scene is assembled from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClassType {
    /// Root of the scene.
    Scene,
    /// Triangle mesh.
    Mesh,
    /// Surface scattering model.
    Bsdf,
    /// Volumetric phase function.
    PhaseFunction,
    /// Light source.
    Emitter,
    /// Participating medium.
    Medium,
    /// Camera.
    Camera,
    /// Light transport algorithm.
    Integrator,
    /// Sample generator.
    Sampler,
    /// Statistical test.
    Test,
    /// Image reconstruction filter.
    ReconstructionFilter,
}

impl Display for ClassType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ClassType::Scene => "scene",
                ClassType::Mesh => "mesh",
                ClassType::Bsdf => "bsdf",
                ClassType::PhaseFunction => "phase",
                ClassType::Emitter => "emitter",
                ClassType::Medium => "medium",
                ClassType::Camera => "camera",
                ClassType::Integrator => "integrator",
                ClassType::Sampler => "sampler",
                ClassType::Test => "test",
                ClassType::ReconstructionFilter => "rfilter",
            }
        )
    }
}

/// Common interface of every object instantiated from a scene description.
///
/// `Display` provides the human-readable summary used for diagnostics.
pub trait SceneObject: Any + Display + Send + Sync {
    /// Returns the kind of this object.
    fn class_type(&self) -> ClassType;

    /// Returns the object as `Any` to allow downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl dyn SceneObject {
    /// Returns a reference to the concrete object if it is of type `T`.
    pub fn downcast_ref<T: SceneObject>(&self) -> Option<&T> { self.as_any().downcast_ref::<T>() }
}

impl Debug for dyn SceneObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self, self.class_type())
    }
}

/// Errors raised by the [`ObjectFactory`].
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// No constructor registered under the requested name.
    #[error("A constructor for class \"{0}\" could not be found")]
    UnknownClass(String),

    /// A constructor is already registered under the name.
    #[error("A constructor for class \"{0}\" was registered twice")]
    DuplicateClass(String),

    /// The object rejected its configuration.
    #[error("Invalid configuration: {0}")]
    Property(#[from] PropertyError),
}

/// Function building an object from its configuration.
pub type ObjectConstructor = fn(&PropertyList) -> Result<Box<dyn SceneObject>, ObjectError>;

/// Registry of object constructors, keyed by class name.
#[derive(Default)]
pub struct ObjectFactory {
    constructors: HashMap<String, ObjectConstructor>,
}

impl ObjectFactory {
    /// Creates an empty factory.
    pub fn new() -> Self { Self::default() }

    /// Registers a constructor under the given name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        ctor: ObjectConstructor,
    ) -> Result<(), ObjectError> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(ObjectError::DuplicateClass(name));
        }
        log::info!("Registering object class \"{}\"", name);
        self.constructors.insert(name, ctor);
        Ok(())
    }

    /// Returns whether a constructor is registered under the given name.
    pub fn is_registered(&self, name: &str) -> bool { self.constructors.contains_key(name) }

    /// Instantiates the object registered under `name` with the given
    /// properties.
    pub fn create(
        &self,
        name: &str,
        props: &PropertyList,
    ) -> Result<Box<dyn SceneObject>, ObjectError> {
        let ctor = self
            .constructors
            .get(name)
            .ok_or_else(|| ObjectError::UnknownClass(name.to_owned()))?;
        let object = ctor(props)?;
        log::debug!("Created {} object: {}", object.class_type(), object);
        Ok(object)
    }
}

impl Debug for ObjectFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.constructors.keys().collect();
        names.sort();
        f.debug_struct("ObjectFactory")
            .field("classes", &names)
            .finish()
    }
}
