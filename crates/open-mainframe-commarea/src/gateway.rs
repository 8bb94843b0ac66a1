//! Program calls through a transaction gateway.
//!
//! The gateway itself is an external collaborator reached through the
//! [`Gateway`] trait. This module builds the request around an encoded
//! commarea, hands it over, and decodes whatever comes back.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{check_len, ConfigError, GatewayConfig};
use crate::decode::decode;
use crate::dump::log_record;
use crate::encode::encode;
use crate::error::CodecError;
use crate::record::Copybook;

/// Gateway return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnCode(pub i32);

impl ReturnCode {
    /// Successful completion.
    pub const OK: ReturnCode = ReturnCode(0);

    /// Whether the call completed normally.
    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "No error",
            -1 => "Invalid data length",
            -2 => "Invalid extend mode",
            -3 => "No CICS",
            -4 => "CICS died",
            -5 => "Request timeout",
            -6 => "Response timeout",
            -7 => "Transaction abend",
            -8 => "Error LUW token",
            -9 => "system error",
            -10 => "Null win handle",
            -12 => "Null message id",
            -14 => "Invalid call type",
            -19 => "Invalid data area",
            -21 => "Invalid version",
            _ => "Unknown",
        }
    }

    /// Turn a non-zero code into [`GatewayError::Remote`].
    ///
    /// `abend` is the raw abend code area; it is cut at the first NUL.
    pub fn check(self, abend: &[u8]) -> Result<(), GatewayError> {
        if self.is_ok() {
            return Ok(());
        }
        let end = abend.iter().position(|&b| b == 0).unwrap_or(abend.len());
        Err(GatewayError::Remote {
            code: self.0,
            abend: String::from_utf8_lossy(&abend[..end]).into_owned(),
            description: self.description().to_string(),
        })
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.description())
    }
}

/// Gateway call errors.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GatewayError {
    /// The request or response record could not be converted.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] CodecError),

    /// The gateway settings are unusable.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The encoded request does not fit the commarea.
    #[error("request of {len} bytes does not fit a {size} byte commarea")]
    #[diagnostic(code(commarea::gateway::payload_too_large))]
    PayloadTooLarge {
        /// Encoded request length.
        len: usize,
        /// Commarea size.
        size: usize,
    },

    /// The gateway reported a failure.
    #[error("gateway error [{code}] {{{abend}}}: {description}")]
    #[diagnostic(code(commarea::gateway::remote))]
    Remote {
        /// Return code.
        code: i32,
        /// Abend code, empty if none.
        abend: String,
        /// Description of the return code.
        description: String,
    },
}

/// A commarea padded with NUL bytes to a fixed size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commarea {
    data: Vec<u8>,
    outbound_length: usize,
}

impl Commarea {
    /// Copy `payload` into a zeroed area of `size` bytes.
    pub fn new(size: usize, payload: &[u8]) -> Result<Self, GatewayError> {
        if payload.len() > size {
            return Err(GatewayError::PayloadTooLarge {
                len: payload.len(),
                size,
            });
        }
        let mut data = vec![0u8; size];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            data,
            outbound_length: payload.len(),
        })
    }

    /// The full padded area.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Area size.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Length of the payload actually sent.
    pub fn outbound_length(&self) -> usize {
        self.outbound_length
    }
}

/// One synchronous program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EciRequest {
    /// Server (region) name.
    pub server: String,
    /// Program to run.
    pub program: String,
    /// Mirror transaction id.
    pub transaction: String,
    /// Transaction program name.
    pub tpn: String,
    /// User id.
    pub user: String,
    /// Password.
    pub password: String,
    /// Request data.
    pub commarea: Commarea,
}

impl EciRequest {
    /// Build a request for `program` from gateway settings and an encoded
    /// payload.
    pub fn new(config: &GatewayConfig, program: &str, payload: &[u8]) -> Result<Self, GatewayError> {
        config.validate()?;
        check_len("program", program, 8)?;
        Ok(Self {
            server: config.server.clone(),
            program: program.to_string(),
            transaction: config.transaction.clone(),
            tpn: config.tpn.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
            commarea: Commarea::new(config.commarea_size, payload)?,
        })
    }
}

/// Transport that runs a program and returns its commarea.
pub trait Gateway {
    /// Execute `request` and return the response commarea.
    fn execute(&mut self, request: &EciRequest) -> Result<Vec<u8>, GatewayError>;
}

/// Encode `request`, run `program`, and decode the response as `Resp`.
pub fn call<Req, Resp, G>(
    gateway: &mut G,
    config: &GatewayConfig,
    program: &str,
    request: &Req,
) -> Result<Resp, GatewayError>
where
    Req: Copybook,
    Resp: Copybook,
    G: Gateway + ?Sized,
{
    let payload = encode(request)?;
    let eci = EciRequest::new(config, program, &payload)?;
    if config.trace {
        log_record(request)?;
    }

    info!(program = %program, server = %config.server, "calling program");
    debug!(
        outbound = eci.commarea.outbound_length(),
        size = eci.commarea.size(),
        "sending commarea"
    );
    let response = gateway.execute(&eci)?;
    debug!(inbound = response.len(), "received commarea");

    let record: Resp = decode(&response)?;
    if config.trace {
        log_record(&record)?;
    }
    Ok(record)
}
