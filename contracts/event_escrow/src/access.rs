//! Capability checks run at the top of every mutating entry point.

use soroban_sdk::Address;

use crate::errors::Error;
use crate::types::{Event, ProtocolConfig};

pub fn require_admin(config: &ProtocolConfig, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != config.admin {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

pub fn require_oracle(config: &ProtocolConfig, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != config.oracle {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

pub fn require_creator(event: &Event, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != event.creator {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Creator or protocol admin.
pub fn require_operator(
    config: &ProtocolConfig,
    event: &Event,
    caller: &Address,
) -> Result<(), Error> {
    caller.require_auth();
    if *caller != event.creator && *caller != config.admin {
        return Err(Error::Unauthorized);
    }
    Ok(())
}
