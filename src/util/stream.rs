use std::io::Read;

/// A readable handle for a request body.
///
/// The handle is only a view of the exchange's transport: dropping it must not tear the
/// underlying connection down. Closing is an explicit operation owned by whichever component
/// reads the body last, never by the request holding the handle.
pub trait BodyStream: Read + Send {}

impl<T: Read + Send> BodyStream for T {}
