use crate::celestrak::TleFetcher;
use crate::ephemeris::catalog::{parse_feed, Satellite, SatelliteSelection};
use crate::ephemeris::propagation::{topocentric_position, Topocentric};
use crate::ephemeris::{
    CardinalDirection, EphemerisError, EphemerisTable, Observer, TimeWindow, VisibilitySample,
};

/// Samples at or below this altitude are dropped.
pub const HORIZON_DEG: f64 = 0.0;

/// Compute every minute of `window` at which a selected satellite is above
/// the observer's horizon.
///
/// Never fails: a feed that cannot be downloaded or parsed produces an empty
/// table carrying a diagnostic.
pub async fn compute_ephemeris<F: TleFetcher>(
    fetcher: &F,
    selection: &SatelliteSelection,
    observer: Observer,
    window: TimeWindow,
) -> EphemerisTable {
    let satellites = match resolve_satellites(fetcher, selection).await {
        Ok(satellites) => satellites,
        Err(e) => {
            log::error!("Failed to resolve satellites for {}: {}", selection.describe(), e);
            return EphemerisTable::failed(format!("Error computing ephemeris: {}", e));
        }
    };

    log::info!(
        "Computing {} satellite(s) over {} minute(s) from {}",
        satellites.len(),
        window.step_count(),
        window.start_utc()
    );

    match tokio::task::spawn_blocking(move || visible_samples(&satellites, &observer, &window))
        .await
    {
        Ok(table) => table,
        Err(e) => {
            log::error!("Ephemeris worker failed: {}", e);
            EphemerisTable::failed(format!("Error computing ephemeris: {}", e))
        }
    }
}

/// A custom TLE always wins over the feed, which is then never downloaded.
pub async fn resolve_satellites<F: TleFetcher>(
    fetcher: &F,
    selection: &SatelliteSelection,
) -> Result<Vec<Satellite>, EphemerisError> {
    if let Some(record) = &selection.custom {
        return Ok(vec![Satellite::from_record(record, "custom TLE")?]);
    }

    let url = selection
        .feed_url
        .as_deref()
        .ok_or(EphemerisError::NothingSelected)?;
    let content = fetcher.fetch_feed(url).await?;
    parse_feed(&content, url)
}

/// Propagate each satellite over each instant and keep what is above the
/// horizon. A satellite that fails to propagate is skipped.
pub fn visible_samples(
    satellites: &[Satellite],
    observer: &Observer,
    window: &TimeWindow,
) -> EphemerisTable {
    let instants = window.instants();
    let mut table = EphemerisTable::default();

    for satellite in satellites {
        for &timestamp in &instants {
            let position = match topocentric_position(observer, satellite, timestamp) {
                Ok(position) => position,
                Err(e) => {
                    log::warn!("Skipping {}: {}", satellite.name, e);
                    table
                        .diagnostics
                        .push(format!("{} at {}: {}", satellite.name, timestamp, e));
                    break;
                }
            };

            if is_visible(&position) {
                table.samples.push(VisibilitySample {
                    satellite: satellite.name.clone(),
                    norad_id: satellite.norad_id,
                    timestamp,
                    right_ascension_h: position.right_ascension_h,
                    declination_deg: position.declination_deg,
                    altitude_deg: position.altitude_deg,
                    azimuth_deg: position.azimuth_deg,
                    direction: CardinalDirection::from_azimuth(position.azimuth_deg),
                });
            }
        }
    }

    table
}

pub fn is_visible(position: &Topocentric) -> bool {
    position.altitude_deg > HORIZON_DEG
}
