//! Info command - show PDU inventory

use anyhow::Result;
use cyberpower_pdu::{PduBackend, PduError};

use crate::output::OutputContext;

/// Show the backend in use and the discovered inventory
pub async fn info(pdu: &dyn PduBackend, target: &str, ctx: &OutputContext) -> Result<()> {
    let banks = match pdu.bank_count() {
        Ok(banks) => banks.to_string(),
        Err(PduError::UnsupportedOperation(_)) => "-".to_string(),
        Err(e) => return Err(e.into()),
    };

    let pairs = vec![
        ("Target", target.to_string()),
        ("Protocol", pdu.name().to_string()),
        ("Outlets", pdu.outlet_count()?.to_string()),
        ("Banks", banks),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}
