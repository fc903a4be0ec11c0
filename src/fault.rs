//! Fault classification and static fault metadata.
//!
//! Every detectable condition is a [`FaultKind`].  Its display text,
//! severity tier and whether it can force a protective shutdown are
//! fixed data held in [`FAULT_TABLE`], indexed by discriminant.  Nothing
//! about a fault's presentation is decided in control flow.
//!
//! ```text
//!  Family        Informational      Caution                   Warning
//!  ───────────   ───────────────    ───────────────────────   ─────────────────
//!  Sensor        1 N1 / 1 EGT ch.   1 engine N1 / EGT lost    all N1 / all EGT
//!  Fuel                             low fuel, over flow       fuel sensor
//!  Speed                            N1 > 105                  N1 > 120
//!  Temperature                      850 start / 950 run       1000 start / 1100 run
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fault identity
// ---------------------------------------------------------------------------

/// Every fault the detector can report.  "No fault" is `Option::None`.
/// Must stay in sync with [`FAULT_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum FaultKind {
    /// One N1 channel of one engine lost.
    SingleN1SensorFail = 0,
    /// Both N1 channels of one engine lost.
    SingleEngineN1TotalFail = 1,
    /// One EGT channel of one engine lost.
    SingleEgtSensorFail = 2,
    /// Both EGT channels of one engine lost.
    SingleEngineEgtTotalFail = 3,
    /// All four N1 channels lost.
    AllN1SensorsFail = 4,
    /// All four EGT channels lost.
    AllEgtSensorsFail = 5,
    /// Fuel below 1000 while the engines are starting or running.
    LowFuel = 6,
    /// Fuel quantity sensor lost.
    FuelSensorFail = 7,
    /// Either engine's fuel flow above 50.
    OverFuelFlow = 8,
    /// N1 above 105 %.
    OverSpeed1 = 9,
    /// N1 above 120 %.
    OverSpeed2 = 10,
    /// EGT above 850 while starting.
    OverTemp1 = 11,
    /// EGT above 1000 while starting.
    OverTemp2 = 12,
    /// EGT above 950 while running.
    OverTemp3 = 13,
    /// EGT above 1100 while running.
    OverTemp4 = 14,
}

impl FaultKind {
    /// Total number of kinds, used to size tables and bitmasks.
    pub const COUNT: usize = 15;

    /// Every kind in discriminant order.
    pub const ALL: [FaultKind; Self::COUNT] = [
        Self::SingleN1SensorFail,
        Self::SingleEngineN1TotalFail,
        Self::SingleEgtSensorFail,
        Self::SingleEngineEgtTotalFail,
        Self::AllN1SensorsFail,
        Self::AllEgtSensorsFail,
        Self::LowFuel,
        Self::FuelSensorFail,
        Self::OverFuelFlow,
        Self::OverSpeed1,
        Self::OverSpeed2,
        Self::OverTemp1,
        Self::OverTemp2,
        Self::OverTemp3,
        Self::OverTemp4,
    ];

    /// Position of this kind in [`FAULT_TABLE`] and [`FaultKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the bit for this kind in a [`FaultMask`].
    pub const fn mask(self) -> u16 {
        1 << (self as u16)
    }

    /// Static metadata for this kind.
    pub fn info(self) -> &'static FaultInfo {
        &FAULT_TABLE[self.index()]
    }

    /// Fixed display text (also the permanent log text).
    pub fn text(self) -> &'static str {
        self.info().text
    }

    pub fn severity(self) -> Severity {
        self.info().severity
    }

    /// True if detecting this kind may force a protective shutdown.
    pub fn is_forcing(self) -> bool {
        self.info().forcing
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Severity tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// White: a redundant channel is lost, indication still valid.
    Informational,
    /// Amber: crew awareness required.
    Caution,
    /// Red: immediate action or automatic protection.
    Warning,
}

/// One row of the fault table.
#[derive(Debug)]
pub struct FaultInfo {
    pub kind: FaultKind,
    pub text: &'static str,
    pub severity: Severity,
    pub forcing: bool,
}

const fn row(kind: FaultKind, text: &'static str, severity: Severity, forcing: bool) -> FaultInfo {
    FaultInfo {
        kind,
        text,
        severity,
        forcing,
    }
}

/// Fault metadata, indexed by `FaultKind as usize`.
pub static FAULT_TABLE: [FaultInfo; FaultKind::COUNT] = {
    use FaultKind as K;
    use Severity::{Caution, Informational, Warning};
    [
        row(K::SingleN1SensorFail, "One N1 Sensor Fail", Informational, false),
        row(K::SingleEngineN1TotalFail, "One Engine N1 Sensor Fail", Caution, false),
        row(K::SingleEgtSensorFail, "One EGT Sensor Fail", Informational, false),
        row(K::SingleEngineEgtTotalFail, "One Engine EGT Sensor Fail", Caution, false),
        row(K::AllN1SensorsFail, "All N1 Sensor Fail", Warning, true),
        row(K::AllEgtSensorsFail, "All EGT Sensor Fail", Warning, true),
        row(K::LowFuel, "Low Fuel 1000", Caution, true),
        row(K::FuelSensorFail, "Fuel Sensor Fail", Warning, false),
        row(K::OverFuelFlow, "Over Fuel Flow 50", Caution, false),
        row(K::OverSpeed1, "Over Speed 105", Caution, false),
        row(K::OverSpeed2, "Over Speed 120", Warning, true),
        row(K::OverTemp1, "Over Temperature 850 when STARTING", Caution, false),
        row(K::OverTemp2, "Over Temperature 1000 when STARTING", Warning, true),
        row(K::OverTemp3, "Over Temperature 950 when RUNNING", Caution, false),
        row(K::OverTemp4, "Over Temperature 1100 when RUNNING", Warning, true),
    ]
};

// ---------------------------------------------------------------------------
// Bitmask
// ---------------------------------------------------------------------------

/// A set of fault kinds packed into a `u16` (one bit per kind).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaultMask(u16);

impl FaultMask {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, kind: FaultKind) -> bool {
        self.0 & kind.mask() != 0
    }

    pub fn insert(&mut self, kind: FaultKind) {
        self.0 |= kind.mask();
    }

    pub fn remove(&mut self, kind: FaultKind) {
        self.0 &= !kind.mask();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the contained kinds in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = FaultKind> {
        FaultKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_match_their_index() {
        for (i, info) in FAULT_TABLE.iter().enumerate() {
            assert_eq!(info.kind.index(), i, "row {i} holds {:?}", info.kind);
        }
        for kind in FaultKind::ALL {
            assert_eq!(kind.info().kind, kind);
        }
    }

    #[test]
    fn masks_are_distinct_bits() {
        let mut seen = 0u16;
        for kind in FaultKind::ALL {
            assert_eq!(seen & kind.mask(), 0, "{kind:?} shares a bit");
            seen |= kind.mask();
        }
        assert_eq!(seen.count_ones() as usize, FaultKind::COUNT);
    }

    #[test]
    fn severity_tiers() {
        assert_eq!(FaultKind::SingleN1SensorFail.severity(), Severity::Informational);
        assert_eq!(FaultKind::SingleEngineEgtTotalFail.severity(), Severity::Caution);
        assert_eq!(FaultKind::LowFuel.severity(), Severity::Caution);
        assert_eq!(FaultKind::FuelSensorFail.severity(), Severity::Warning);
        assert_eq!(FaultKind::OverTemp4.severity(), Severity::Warning);
        assert!(Severity::Warning > Severity::Caution);
    }

    #[test]
    fn forcing_kinds_are_warnings_or_low_fuel() {
        for kind in FaultKind::ALL.into_iter().filter(|k| k.is_forcing()) {
            assert!(
                kind.severity() == Severity::Warning || kind == FaultKind::LowFuel,
                "{kind:?} forces a shutdown but is only {:?}",
                kind.severity()
            );
        }
    }

    #[test]
    fn display_uses_table_text() {
        assert_eq!(FaultKind::OverSpeed2.to_string(), "Over Speed 120");
        assert_eq!(
            FaultKind::OverTemp1.to_string(),
            "Over Temperature 850 when STARTING"
        );
    }

    #[test]
    fn mask_insert_remove_iter() {
        let mut m = FaultMask::EMPTY;
        m.insert(FaultKind::OverTemp2);
        m.insert(FaultKind::LowFuel);
        assert!(m.contains(FaultKind::OverTemp2));
        assert!(!m.contains(FaultKind::OverTemp1));
        assert_eq!(
            m.iter().collect::<Vec<_>>(),
            vec![FaultKind::LowFuel, FaultKind::OverTemp2]
        );
        m.remove(FaultKind::LowFuel);
        m.remove(FaultKind::OverTemp2);
        assert!(m.is_empty());
    }
}
