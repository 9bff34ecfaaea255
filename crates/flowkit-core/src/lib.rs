//! # flowkit core
//!
//! Data model and seams shared by the flowkit crates: generation requests and
//! responses, model references, the backend trait and the flow trait.

pub mod backend;
pub mod error;
pub mod flow;
pub mod model;
pub mod request;

pub use backend::{GenerationBackend, SharedBackend};
pub use error::{ConfigError, CoreError, GenerationError, Result};
pub use flow::{Flow, FlowMetadata, FnFlow, SharedFlow, flow_fn};
pub use model::{ModelReference, ModelType};
pub use request::{
    GenerationConfig, GenerationRequest, GenerationResponse, Message, RequestId, Role, Usage,
};
