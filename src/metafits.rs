// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where and when an observation was made, and where it was pointed.
//!
//! Anything read from a metafits file goes through mwalib.

use std::{f64::consts::TAU, path::Path};

use hifitime::{Duration, Epoch};
use log::debug;
use marlu::{
    precession::{get_lmst, precess_time},
    AzEl, LatLngHeight, RADec,
};
use mwalib::{MetafitsContext, MwalibError};

use crate::catalog::HorizontalTransform;

/// The parts of a metafits file needed to find lobes.
#[derive(Clone, Debug, PartialEq)]
pub struct MetafitsInfo {
    pub obsid: u32,

    /// The tile pointing centre.
    pub pointing: AzEl,

    /// The local sidereal time at the start of the observation \[radians\].
    pub lst_rad: f64,

    /// UT1 - UTC \[seconds\], if the metafits file has it.
    pub dut1: Option<f64>,

    /// The scheduled start of the observation.
    pub start: Epoch,
}

impl MetafitsInfo {
    pub fn read<P: AsRef<Path>>(metafits: P) -> Result<MetafitsInfo, MwalibError> {
        let context = MetafitsContext::new(metafits.as_ref(), None)?;
        debug!(
            "Read obsid {} from {}",
            context.obs_id, context.metafits_filename
        );
        Ok(MetafitsInfo {
            obsid: context.obs_id,
            pointing: AzEl::from_degrees(context.az_deg, context.alt_deg),
            lst_rad: context.lst_rad,
            dut1: context.dut1,
            start: Epoch::from_gpst_seconds(context.sched_start_gps_time_ms as f64 / 1e3),
        })
    }
}

/// The local mean sidereal time \[radians\] at `gps_seconds` for an array at
/// `array_position`.
pub fn lst_from_gps(gps_seconds: f64, array_position: LatLngHeight, dut1_seconds: f64) -> f64 {
    get_lmst(
        array_position.longitude_rad,
        Epoch::from_gpst_seconds(gps_seconds),
        Duration::from_seconds(dut1_seconds),
    )
}

/// An observation's pointing and the sidereal time and place it was made.
/// This is all that's needed to put sources on the sky in horizontal
/// coordinates.
///
/// Catalogue positions are J2000. If the time of the observation is known,
/// the LST and array latitude are precessed to J2000 before sources are
/// rotated onto the sky.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub obsid: Option<u32>,
    pub pointing: AzEl,

    /// The local sidereal time of date \[radians\].
    pub lst_rad: f64,

    pub array_position: LatLngHeight,

    /// The LST used with J2000 positions \[radians\].
    lst_j2000_rad: f64,

    /// The array latitude used with J2000 positions \[radians\].
    latitude_j2000_rad: f64,

    precessed: bool,
}

impl Observation {
    /// `time` is when the observation was made and its UT1 - UTC. Without it,
    /// J2000 positions are treated as positions of date.
    pub fn new(
        obsid: Option<u32>,
        pointing: AzEl,
        lst_rad: f64,
        array_position: LatLngHeight,
        time: Option<(Epoch, Duration)>,
    ) -> Observation {
        let (lst_j2000_rad, latitude_j2000_rad, precessed) = match time {
            Some((epoch, dut1)) => {
                let info = precess_time(
                    array_position.longitude_rad,
                    array_position.latitude_rad,
                    RADec::from_radians(lst_rad, array_position.latitude_rad),
                    epoch,
                    dut1,
                );
                // An LST that was given explicitly may not be the LMST of the
                // epoch; keep that offset.
                let lst_j2000 = (lst_rad + info.lmst_j2000 - info.lmst).rem_euclid(TAU);
                debug!(
                    "GPS time {}: LMST {:.6}°, J2000 LMST {:.6}°, J2000 latitude {:.6}°",
                    epoch.to_gpst_seconds(),
                    info.lmst.to_degrees(),
                    info.lmst_j2000.to_degrees(),
                    info.array_latitude_j2000.to_degrees()
                );
                (lst_j2000, info.array_latitude_j2000, true)
            }
            None => (lst_rad, array_position.latitude_rad, false),
        };

        Observation {
            obsid,
            pointing,
            lst_rad,
            array_position,
            lst_j2000_rad,
            latitude_j2000_rad,
            precessed,
        }
    }

    /// The (LST, array latitude) \[radians\] that J2000 positions are rotated
    /// with. These are the values of date if the observation wasn't
    /// precessed.
    pub fn j2000_frame(&self) -> (f64, f64) {
        (self.lst_j2000_rad, self.latitude_j2000_rad)
    }

    pub fn is_precessed(&self) -> bool {
        self.precessed
    }
}

impl HorizontalTransform for Observation {
    fn to_azel(&self, radec: RADec) -> AzEl {
        radec
            .to_hadec(self.lst_j2000_rad)
            .to_azel(self.latitude_j2000_rad)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::lobes::circular::wrap_angle;

    fn observation(lst_deg: f64) -> Observation {
        Observation::new(
            Some(1090008640),
            AzEl::from_degrees(0.0, 90.0),
            lst_deg.to_radians(),
            LatLngHeight::mwa(),
            None,
        )
    }

    #[test]
    fn test_zenith_source() {
        let obs = observation(60.0);
        let lat = obs.array_position.latitude_rad;
        let azel = obs.to_azel(RADec::from_radians(obs.lst_rad, lat));
        assert_abs_diff_eq!(azel.el, FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_source_on_the_meridian() {
        // A source south of zenith (the MWA is in the southern hemisphere, so
        // more negative declinations are towards the south pole) on the
        // meridian has an azimuth of 180°.
        let obs = observation(60.0);
        let lat_deg = obs.array_position.latitude_rad.to_degrees();
        let azel = obs.to_azel(RADec::from_degrees(60.0, lat_deg - 20.0));
        assert_abs_diff_eq!(wrap_angle(azel.az), PI, epsilon = 1e-9);
        assert_abs_diff_eq!(azel.el.to_degrees(), 70.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rising_and_setting() {
        let obs = observation(0.0);
        // Positive hour angle is west of the meridian.
        let west = obs.to_azel(RADec::from_degrees(-30.0, -26.7));
        let east = obs.to_azel(RADec::from_degrees(30.0, -26.7));
        assert!(wrap_angle(west.az) > PI, "{}", west.az);
        assert!(wrap_angle(east.az) < PI, "{}", east.az);
        assert_abs_diff_eq!(west.el, east.el, epsilon = 1e-9);

        // The opposite side of the sky is below the horizon.
        let below = obs.to_azel(RADec::from_degrees(180.0, 10.0));
        assert!(below.el < 0.0);
    }

    #[test]
    fn test_lst_from_gps() {
        let mwa = LatLngHeight::mwa();
        let lst = lst_from_gps(1090008640.0, mwa, 0.0);
        assert!((0.0..TAU).contains(&lst), "{lst}");

        // A sidereal day is ~4 minutes shorter than a solar day, so the LST
        // a solar day later is ~0.986° further along.
        let next_day = lst_from_gps(1090008640.0 + 86400.0, mwa, 0.0);
        assert_abs_diff_eq!(
            wrap_angle(next_day - lst).to_degrees(),
            0.9856,
            epsilon = 1e-3
        );

        // DUT1 only nudges things.
        let with_dut1 = lst_from_gps(1090008640.0, mwa, 0.3);
        assert!((with_dut1 - lst).abs() < 1e-4);
        assert!((with_dut1 - lst).abs() > 0.0);
    }

    #[test]
    fn test_precession_to_j2000() {
        let gps = 1099334672.0;
        let mwa = LatLngHeight::mwa();
        let lst = lst_from_gps(gps, mwa, 0.0);
        let zenith = AzEl::from_degrees(0.0, 90.0);
        let time = (Epoch::from_gpst_seconds(gps), Duration::from_seconds(0.0));

        let precessed = Observation::new(Some(1099334672), zenith, lst, mwa, Some(time));
        assert!(precessed.is_precessed());
        let (lst_j2000, latitude_j2000) = precessed.j2000_frame();
        assert_abs_diff_eq!(lst, 1.4598017673520172, epsilon = 1e-9);
        assert_abs_diff_eq!(lst_j2000, 1.4571918352968762, epsilon = 1e-9);
        assert_abs_diff_eq!(latitude_j2000, -0.4661807836570052, epsilon = 1e-9);

        // The J2000 zenith is at the zenith.
        let azel = precessed.to_azel(RADec::from_radians(lst_j2000, latitude_j2000));
        assert_abs_diff_eq!(azel.el, FRAC_PI_2, epsilon = 1e-9);

        // Without precession, a source moves by roughly the precession since
        // 2000 (~0.2°).
        let of_date = Observation::new(Some(1099334672), zenith, lst, mwa, None);
        assert!(!of_date.is_precessed());
        assert_eq!(of_date.j2000_frame(), (lst, mwa.latitude_rad));
        let source = RADec::from_degrees(60.0, -30.0);
        let a = precessed.to_azel(source);
        let b = of_date.to_azel(source);
        let offset = (a.el - b.el).abs().max(angle_between(a.az, b.az) * a.el.cos());
        assert!(offset.to_degrees() > 0.05, "{}", offset.to_degrees());
        assert!(offset.to_degrees() < 0.5, "{}", offset.to_degrees());
    }

    #[test]
    fn test_precession_keeps_an_explicit_lst_offset() {
        let gps = 1099334672.0;
        let mwa = LatLngHeight::mwa();
        let lst = lst_from_gps(gps, mwa, 0.0);
        let time = (Epoch::from_gpst_seconds(gps), Duration::from_seconds(0.0));
        let zenith = AzEl::from_degrees(0.0, 90.0);

        let at_epoch = Observation::new(None, zenith, lst, mwa, Some(time));
        let later = Observation::new(None, zenith, lst + 0.01, mwa, Some(time));
        assert_abs_diff_eq!(
            later.j2000_frame().0 - at_epoch.j2000_frame().0,
            0.01,
            epsilon = 1e-12
        );
    }

    fn angle_between(a: f64, b: f64) -> f64 {
        let d = wrap_angle(a - b);
        d.min(TAU - d)
    }
}
