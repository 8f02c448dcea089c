//! AirFiber 24 radio check
//!
//! Fetches `status.cgi` and reports link metrics at fixed threshold
//! positions, plus a set of key=value equality checks for states that
//! are either right or wrong (link state, GPS fix, overload flags):
//! any mismatch there is immediately CRITICAL.

use anyhow::Result;
use check_lib::lookup::{format_number, lookup, value_to_string};
use check_lib::session::DeviceSession;
use check_lib::{CheckEngine, PerfData, Status};

use crate::device::{number_at, string_at};

/// Keys that must hold these exact values on a healthy link.
pub const DEFAULT_BOOLEAN_CHECKS: &str = "airfiber.rxpower0valid=1,airfiber.rxpower1valid=1,\
    airfiber.rxoverload0=0,airfiber.rxoverload1=0,gps.status=1,gps.fix=1,\
    airfiber.data_speed=1000Mbps-Full,airfiber.linkstate=operational";

pub async fn run(engine: &mut CheckEngine, session: &DeviceSession, boolean: &str) -> Result<()> {
    let data = session.fetch("status").await?;

    // dactemp0/dactemp1 are only reported by v1.x firmware
    let fwversion = string_at(&data, "host.fwversion")?;
    let has_temperatures = fwversion.starts_with("v1.");

    let txmodrate = string_at(&data, "airfiber.txmodrate")?
        .trim_end_matches('x')
        .to_string();
    let dop_quality = format_number(dop_quality(number_at(&data, "gps.dop")?) as f64);

    // (label, value, position, uom, min, max)
    type Metric<'a> = (&'a str, String, usize, Option<&'a str>, Option<&'a str>, Option<&'a str>);
    let mut metrics: Vec<Metric> = vec![
        (
            "airfiber.rxpower0",
            string_at(&data, "airfiber.rxpower0")?,
            0,
            None,
            Some("-100"),
            Some("0"),
        ),
        (
            "airfiber.rxpower1",
            string_at(&data, "airfiber.rxpower1")?,
            1,
            None,
            Some("-100"),
            Some("0"),
        ),
        (
            "airfiber.rxcapacity",
            string_at(&data, "airfiber.rxcapacity")?,
            2,
            None,
            Some("0"),
            Some("750000000"),
        ),
        (
            "airfiber.txcapacity",
            string_at(&data, "airfiber.txcapacity")?,
            3,
            None,
            Some("0"),
            Some("750000000"),
        ),
        ("airfiber.txmodrate", txmodrate, 4, None, Some("0"), Some("6")),
        (
            "wireless.distance",
            string_at(&data, "wireless.distance")?,
            5,
            None,
            Some("100"),
            Some("15000"),
        ),
    ];
    if has_temperatures {
        metrics.push((
            "airfiber.dactemp0",
            string_at(&data, "airfiber.dactemp0")?,
            6,
            None,
            Some("-50"),
            Some("65"),
        ));
        metrics.push((
            "airfiber.dactemp1",
            string_at(&data, "airfiber.dactemp1")?,
            7,
            None,
            Some("-50"),
            Some("65"),
        ));
    }
    metrics.push(("gps.dop_quality", dop_quality, 8, Some("%"), Some("0"), Some("100")));
    metrics.push((
        "gps.sats",
        string_at(&data, "gps.sats")?,
        9,
        None,
        Some("0"),
        Some("10"),
    ));

    for (label, value, position, uom, min, max) in &metrics {
        let mut item = PerfData::new(*label, value);
        if let Some(uom) = uom {
            item = item.uom(*uom);
        }
        if let Some(min) = min {
            item = item.min(*min);
        }
        if let Some(max) = max {
            item = item.max(*max);
        }
        engine.record_performance(item, *position);
    }

    for (label, value, position, ..) in &metrics {
        if engine.evaluate(value, *position) != Status::Ok {
            engine.append_detail(label);
        }
    }

    for entry in boolean.split(',') {
        if entry.is_empty() {
            continue;
        }
        let Some((key, expected)) = entry.split_once('=') else {
            continue;
        };
        if key.is_empty() || expected.is_empty() {
            continue;
        }

        let Some(value) = lookup(&data, key) else {
            // A key the caller insisted on is not in the response at all
            engine.override_status(Status::Unknown, key);
            return Ok(());
        };
        let observed = value_to_string(value);
        if observed != expected {
            engine.escalate(Status::Critical);
            engine.append_detail(key);
        }
        engine.record_performance(PerfData::new(key, observed), 0);
    }

    Ok(())
}

/// GPS quality ladder derived from the dilution of precision.
fn dop_quality(dop: f64) -> u32 {
    if dop > 20.0 {
        10
    } else if dop > 15.0 {
        20
    } else if dop > 10.0 {
        30
    } else if dop > 7.0 {
        40
    } else if dop > 5.0 {
        50
    } else if dop > 3.5 {
        60
    } else if dop > 2.0 {
        70
    } else if dop > 1.5 {
        80
    } else if dop > 1.0 {
        90
    } else if dop > 0.0 {
        100
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dop_quality_ladder() {
        assert_eq!(dop_quality(25.0), 10);
        assert_eq!(dop_quality(16.0), 20);
        assert_eq!(dop_quality(12.0), 30);
        assert_eq!(dop_quality(8.0), 40);
        assert_eq!(dop_quality(6.0), 50);
        assert_eq!(dop_quality(4.0), 60);
        assert_eq!(dop_quality(3.0), 70);
        assert_eq!(dop_quality(1.7), 80);
        assert_eq!(dop_quality(1.2), 90);
        assert_eq!(dop_quality(0.8), 100);
        assert_eq!(dop_quality(0.0), 0);
        assert_eq!(dop_quality(-1.0), 0);
    }

    #[test]
    fn test_default_boolean_checks_are_well_formed() {
        for entry in DEFAULT_BOOLEAN_CHECKS.split(',') {
            let (key, value) = entry.split_once('=').expect("entry has a '='");
            assert!(!key.is_empty());
            assert!(!value.is_empty());
        }
    }
}
