//! SCMI voltage domain protocol responder
//!
//! [`VoltdResponder::dispatch`] takes one request (agent, message id and
//! payload) and returns exactly one [`Response`]. Handlers are looked up
//! in a dense table indexed by message id; every handler checks the exact
//! payload size, then clamps the domain id against the agent's domain
//! count before the platform sees it.
//!
//! Handlers return `Err(status)` for every failure, and the dispatcher
//! turns that into a status-only response, so a failing path can never
//! leave payload bytes behind.

mod domain;
mod platform;

pub use domain::{DomainOps, DomainRegistry, VoltageDomain};
pub use platform::{LevelRange, VoltdPlatform};

use zerocopy::byteorder::little_endian::{I32, U32};
use zerocopy::FromBytes;

use crate::index::{DomainIndex, bounded};
use crate::message::{
    AttributesP2a, ConfigGetP2a, ConfigSetA2p, DescribeLevelsA2p, DescribeLevelsP2a, DomainA2p,
    DomainAttributesP2a, LEVELS_PER_RESPONSE, LevelFormat, LevelGetP2a, LevelSetA2p,
    MessageAttributesA2p, PROTOCOL_VERSION, VersionP2a, config, encode_name, levels_flags,
};
use crate::response::Response;
use crate::status::{ScmiResult, ScmiStatus};

type Handler<P> = fn(&mut VoltdResponder<P>, u32, &[u8]) -> ScmiResult<Response>;

/// Decode a request whose size must match `T` exactly.
fn parse<T: FromBytes>(payload: &[u8]) -> ScmiResult<T> {
    T::read_from_bytes(payload).map_err(|_| ScmiStatus::ProtocolError)
}

fn expect_empty(payload: &[u8]) -> ScmiResult {
    if payload.is_empty() {
        Ok(())
    } else {
        Err(ScmiStatus::ProtocolError)
    }
}

const SUCCESS: I32 = I32::new(ScmiStatus::Success.as_i32());

/// Voltage domain responder over a platform backend.
pub struct VoltdResponder<P> {
    platform: P,
}

impl<P: VoltdPlatform> VoltdResponder<P> {
    /// Handlers indexed by message id
    const HANDLERS: [Handler<P>; 9] = [
        Self::version,
        Self::attributes,
        Self::message_attributes,
        Self::domain_attributes,
        Self::describe_levels,
        Self::config_set,
        Self::config_get,
        Self::level_set,
        Self::level_get,
    ];

    pub const fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Whether `message_id` has a handler.
    pub fn is_supported(message_id: u32) -> bool {
        bounded(message_id, Self::HANDLERS.len()).is_some()
    }

    /// Handle one request.
    pub fn dispatch(&mut self, agent: u32, message_id: u32, payload: &[u8]) -> Response {
        log::trace!("voltd: agent {} msg {:#x} len {}", agent, message_id, payload.len());

        let Some(handler) = bounded(message_id, Self::HANDLERS.len()).map(|i| Self::HANDLERS[i])
        else {
            log::debug!("voltd: no handler for msg {:#x}", message_id);
            return Response::status(ScmiStatus::NotFound);
        };

        match handler(self, agent, payload) {
            Ok(response) => response,
            Err(status) => {
                log::debug!("voltd: msg {:#x} failed: {}", message_id, status);
                Response::status(status)
            }
        }
    }

    fn domain(&self, agent: u32, raw: U32) -> ScmiResult<DomainIndex> {
        DomainIndex::new(raw.get(), self.platform.domain_count(agent))
            .ok_or(ScmiStatus::InvalidParameters)
    }

    fn version(&mut self, _agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        expect_empty(payload)?;
        Ok(Response::from_message(&VersionP2a {
            status: SUCCESS,
            version: U32::new(PROTOCOL_VERSION),
        }))
    }

    /// Number of domains visible to the agent.
    fn attributes(&mut self, agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        expect_empty(payload)?;
        let count = self.platform.domain_count(agent);
        Ok(Response::from_message(&AttributesP2a {
            status: SUCCESS,
            attributes: U32::new(u32::try_from(count).unwrap_or(u32::MAX)),
        }))
    }

    fn message_attributes(&mut self, _agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        let req: MessageAttributesA2p = parse(payload)?;
        if !Self::is_supported(req.message_id.get()) {
            return Err(ScmiStatus::NotFound);
        }
        Ok(Response::from_message(&AttributesP2a {
            status: SUCCESS,
            attributes: U32::new(0),
        }))
    }

    fn domain_attributes(&mut self, agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        let req: DomainA2p = parse(payload)?;
        let domain = self.domain(agent, req.domain_id)?;
        let name = self
            .platform
            .domain_name(agent, domain)
            .ok_or(ScmiStatus::NotFound)?;

        Ok(Response::from_message(&DomainAttributesP2a {
            status: SUCCESS,
            attributes: U32::new(self.platform.domain_attributes(agent, domain)),
            name: encode_name(name),
        }))
    }

    /// List window when the platform enumerates levels, otherwise the
    /// min/max/step triple.
    fn describe_levels(&mut self, agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        let req: DescribeLevelsA2p = parse(payload)?;
        let domain = self.domain(agent, req.domain_id)?;

        match self.platform.level_count(agent, domain) {
            Ok(total) => {
                let start = bounded(req.level_index.get(), total.saturating_add(1))
                    .ok_or(ScmiStatus::InvalidParameters)?;
                let window = (total - start).min(LEVELS_PER_RESPONSE);

                let mut levels = [0i32; LEVELS_PER_RESPONSE];
                let written = self
                    .platform
                    .levels_array(agent, domain, start, &mut levels[..window])?
                    .min(window);
                // A short write leaves the rest for the next page
                let remaining = total - start - written;

                let header = DescribeLevelsP2a {
                    status: SUCCESS,
                    flags: U32::new(levels_flags(written as u32, LevelFormat::List, remaining as u32)),
                };
                Ok(Response::with_tail(&header, &levels[..written]))
            }
            Err(ScmiStatus::NotSupported) => {
                let range = self.platform.levels_by_step(agent, domain)?;
                let header = DescribeLevelsP2a {
                    status: SUCCESS,
                    flags: U32::new(levels_flags(3, LevelFormat::Range, 0)),
                };
                Ok(Response::with_tail(&header, &range.to_array()))
            }
            Err(status) => Err(status),
        }
    }

    fn config_set(&mut self, agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        let req: ConfigSetA2p = parse(payload)?;
        let domain = self.domain(agent, req.domain_id)?;
        let cfg = req.config.get();
        let mode = cfg & config::MODE_ID_MASK;

        if cfg & config::MODE_TYPE_IMPL == 0 {
            self.platform
                .set_state(agent, domain, mode == config::MODE_ID_ON)?;
        } else {
            self.platform.set_state_custom(agent, domain, mode)?;
        }
        Ok(Response::status(ScmiStatus::Success))
    }

    fn config_get(&mut self, agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        let req: DomainA2p = parse(payload)?;
        let domain = self.domain(agent, req.domain_id)?;

        let cfg = match self.platform.get_state(agent, domain) {
            Ok(true) => config::MODE_ID_ON,
            Ok(false) => config::MODE_ID_OFF,
            Err(ScmiStatus::NotSupported) => {
                let mode = self.platform.get_state_custom(agent, domain)?;
                config::MODE_TYPE_IMPL | (mode & config::MODE_ID_MASK)
            }
            Err(status) => return Err(status),
        };

        Ok(Response::from_message(&ConfigGetP2a {
            status: SUCCESS,
            config: U32::new(cfg),
        }))
    }

    /// Synchronous only; the async flag is ignored.
    fn level_set(&mut self, agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        let req: LevelSetA2p = parse(payload)?;
        let domain = self.domain(agent, req.domain_id)?;
        let level = req.voltage_level.get();

        if let Ok(range) = self.platform.levels_by_step(agent, domain) {
            if !range.contains(level) {
                return Err(ScmiStatus::InvalidParameters);
            }
        }

        self.platform.set_level(agent, domain, level)?;
        Ok(Response::status(ScmiStatus::Success))
    }

    fn level_get(&mut self, agent: u32, payload: &[u8]) -> ScmiResult<Response> {
        let req: DomainA2p = parse(payload)?;
        let domain = self.domain(agent, req.domain_id)?;
        let level = self.platform.get_level(agent, domain)?;

        Ok(Response::from_message(&LevelGetP2a {
            status: SUCCESS,
            voltage_level: I32::new(level),
        }))
    }
}
