use crate::error::Result;
use crate::types::ActorId;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use crate::error::Error;

/// Application identity resolved by the authenticator chain.
///
/// Implementations are the application's account or user records. The id is
/// the stable key used for session storage and change detection.
pub trait Actor: Any + fmt::Debug + Send + Sync {
    /// Returns the stable identifier.
    fn id(&self) -> ActorId;

    /// Upcasts to [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Shared actor handle.
pub type ActorRef = Arc<dyn Actor>;

/// Encodes actors into opaque session values and back.
pub trait ActorCodec: Send + Sync {
    /// Encodes an actor into a session-storable value.
    fn encode(&self, actor: &dyn Actor) -> Result<String>;

    /// Decodes a previously encoded value.
    fn decode(&self, value: &str) -> Result<ActorRef>;
}

/// JSON codec over a concrete actor type.
#[cfg(feature = "serde")]
#[derive(Debug)]
pub struct JsonActorCodec<A> {
    _actor: std::marker::PhantomData<fn() -> A>,
}

#[cfg(feature = "serde")]
impl<A> JsonActorCodec<A> {
    /// Creates a codec for `A`.
    pub fn new() -> Self {
        Self {
            _actor: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<A> Default for JsonActorCodec<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "serde")]
impl<A> ActorCodec for JsonActorCodec<A>
where
    A: Actor + serde::Serialize + serde::de::DeserializeOwned,
{
    fn encode(&self, actor: &dyn Actor) -> Result<String> {
        let actor = actor.as_any().downcast_ref::<A>().ok_or_else(|| {
            Error::Codec(format!(
                "expected actor type {}",
                std::any::type_name::<A>()
            ))
        })?;
        serde_json::to_string(actor).map_err(|error| Error::Codec(error.to_string()))
    }

    fn decode(&self, value: &str) -> Result<ActorRef> {
        let actor: A =
            serde_json::from_str(value).map_err(|error| Error::Codec(error.to_string()))?;
        Ok(Arc::new(actor))
    }
}
