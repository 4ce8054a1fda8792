//! Fault catalog — per-kind list of faults a component can fail with.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};
use crate::{ComponentKind, Fault};

pub type CatalogEntries = BTreeMap<ComponentKind, Vec<Fault>>;

/// Immutable mapping `kind -> faults`. Construction rejects catalogs that do
/// not cover every `ComponentKind` with at least one fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogEntries", into = "CatalogEntries")]
pub struct FaultCatalog {
    entries: CatalogEntries,
}

impl FaultCatalog {
    pub fn new(entries: CatalogEntries) -> Result<Self> {
        for kind in ComponentKind::ALL {
            match entries.get(&kind) {
                Some(faults) if !faults.is_empty() => {}
                _ => {
                    return Err(FleetError::InvalidContent(format!(
                        "fault catalog has no faults for {kind}"
                    )))
                }
            }
        }
        Ok(Self { entries })
    }

    /// Built-in reference data: three faults per kind.
    pub fn reference() -> Self {
        fn fault(name: &str, cost: u32, remedy: &str) -> Fault {
            Fault {
                name: name.to_string(),
                cost,
                remedy: remedy.to_string(),
            }
        }

        let entries = BTreeMap::from([
            (
                ComponentKind::Motherboard,
                vec![
                    fault("Burnt circuit", 300, "Replace the damaged circuit"),
                    fault("RAM connection failure", 150, "Repair the RAM slots"),
                    fault("Corrupted BIOS", 200, "Reflash or update the BIOS"),
                ],
            ),
            (
                ComponentKind::Cpu,
                vec![
                    fault("Overheating", 250, "Replace the cooler or reapply thermal paste"),
                    fault("Damaged pins", 400, "Replace the processor"),
                    fault("Instruction execution fault", 350, "Reconfigure the processor"),
                ],
            ),
            (
                ComponentKind::Ram,
                vec![
                    fault("Module failure", 100, "Replace the memory module"),
                    fault("Parity error", 120, "Repair the memory"),
                    fault("Unstable motherboard connection", 150, "Adjust the connectors"),
                ],
            ),
            (
                ComponentKind::Storage,
                vec![
                    fault("Bad sectors", 200, "Repair sectors or clone the disk"),
                    fault("Faulty disk controller", 250, "Replace the controller"),
                    fault("SSD wear-out", 300, "Replace the SSD"),
                ],
            ),
            (
                ComponentKind::PowerSupply,
                vec![
                    fault("Power loss", 150, "Replace the capacitors"),
                    fault("Overload", 180, "Repair the internal circuit"),
                    fault("Blown capacitor", 200, "Replace the capacitor"),
                ],
            ),
        ]);
        Self { entries }
    }

    /// Skips coverage validation; lets tests build a broken catalog.
    #[cfg(any(test, feature = "test-support"))]
    pub fn unchecked(entries: CatalogEntries) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, kind: ComponentKind) -> Result<&[Fault]> {
        self.entries
            .get(&kind)
            .map(Vec::as_slice)
            .ok_or(FleetError::UnknownKind(kind))
    }

    /// Pick one fault for `kind` uniformly at random.
    pub fn draw(&self, kind: ComponentKind, rng: &mut impl Rng) -> Result<Fault> {
        self.lookup(kind)?
            .choose(rng)
            .cloned()
            .ok_or(FleetError::UnknownKind(kind))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentKind, &[Fault])> {
        self.entries.iter().map(|(kind, faults)| (*kind, faults.as_slice()))
    }
}

impl TryFrom<CatalogEntries> for FaultCatalog {
    type Error = FleetError;

    fn try_from(entries: CatalogEntries) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<FaultCatalog> for CatalogEntries {
    fn from(catalog: FaultCatalog) -> Self {
        catalog.entries
    }
}
