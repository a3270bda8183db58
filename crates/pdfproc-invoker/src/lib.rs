//! PDF Processor Invoker Library
//!
//! This crate talks to the remote extraction function. It includes the
//! FunctionInvoker trait with an AWS Lambda implementation, the request and
//! response payload contract, and an optional S3 existence check run before
//! invoking.

pub mod factory;
#[cfg(feature = "lambda")]
pub mod lambda;
#[cfg(feature = "s3-locator")]
pub mod locator;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
pub mod payload;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_invoker, create_locator};
#[cfg(feature = "lambda")]
pub use lambda::LambdaInvoker;
#[cfg(feature = "s3-locator")]
pub use locator::S3ObjectLocator;
#[cfg(any(test, feature = "test-helpers"))]
pub use mock::{MockInvoker, MockLocator};
pub use payload::{decode_response, encode_request};
pub use traits::{
    FunctionInvoker, InvocationResponse, InvokeError, InvokeResult, ObjectLocator,
};
