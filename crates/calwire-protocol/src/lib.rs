//! JSON wire format for calendar values.
//!
//! Each domain type from `calwire_core` has a [`Serializer`] that converts it
//! to and from the object shape the calendar service uses.
//!
//! ```ignore
//! use calwire_protocol::{EventSerializer, Serializer};
//!
//! let event = EventSerializer::decode_str(payload)?;
//! let json = EventSerializer::encode(&event)?;
//! ```

pub mod contract;
pub mod error;
pub mod registry;
pub mod serializers;

pub use contract::{Serializer, WireInput, WireObject, strip_nulls};
pub use error::{ProtocolError, ProtocolResult};
pub use registry::{SerializerDescriptor, registered_serializers, verify_registry};
pub use serializers::*;
