//! AirMax (UBNT-M) radio check
//!
//! Fetches `status.cgi` and reports nine metrics at fixed threshold
//! positions: signal, both signal chains, noise floor, ccq, airmax
//! quality, airmax capacity and the tx/rx rates. The chain signals are
//! derived from the per-chain RSSI the same way the AirOS UI does.

use anyhow::Result;
use check_lib::lookup::format_number;
use check_lib::session::DeviceSession;
use check_lib::{CheckEngine, PerfData, Status};

use crate::device::{number_at, string_at};

pub async fn run(engine: &mut CheckEngine, session: &DeviceSession) -> Result<()> {
    let data = session.fetch("status").await?;

    let signal = string_at(&data, "wireless.signal")?;
    let chain0 = format_number((96.0 - number_at(&data, "wireless.chainrssi.0")?) * -1.0);
    let chain1 = format_number((96.0 - number_at(&data, "wireless.chainrssi.1")?) * -1.0);
    let noise = string_at(&data, "wireless.noisef")?;
    let ccq = format_number((number_at(&data, "wireless.ccq")? / 10.0).trunc());
    let quality = string_at(&data, "wireless.polling.quality")?;
    let capacity = string_at(&data, "wireless.polling.capacity")?;
    let txrate = string_at(&data, "wireless.txrate")?;
    let rxrate = string_at(&data, "wireless.rxrate")?;

    // (label, value, uom, min, max), indexed by threshold position
    let metrics: [(&str, &str, Option<&str>, Option<&str>, Option<&str>); 9] = [
        ("signal", &signal, None, Some("-100"), Some("0")),
        ("signalchain0", &chain0, None, Some("-100"), Some("0")),
        ("signalchain1", &chain1, None, Some("-100"), Some("0")),
        ("noise", &noise, None, Some("-100"), Some("0")),
        ("ccq", &ccq, Some("%"), None, None),
        ("airmaxquality", &quality, Some("%"), None, None),
        ("airmaxcapacity", &capacity, Some("%"), None, None),
        ("txrate", &txrate, None, Some("0"), Some("270")),
        ("rxrate", &rxrate, None, Some("0"), Some("270")),
    ];

    for (position, (label, value, uom, min, max)) in metrics.iter().enumerate() {
        let mut item = PerfData::new(*label, *value);
        if let Some(uom) = uom {
            item = item.uom(*uom);
        }
        if let Some(min) = min {
            item = item.min(*min);
        }
        if let Some(max) = max {
            item = item.max(*max);
        }
        engine.record_performance(item, position);
    }

    for (position, (label, value, ..)) in metrics.iter().enumerate() {
        if engine.evaluate(value, position) != Status::Ok {
            engine.append_detail(label);
        }
    }

    Ok(())
}
