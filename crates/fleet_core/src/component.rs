//! Single degrading unit.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::FaultCatalog;
use crate::error::Result;
use crate::{ComponentId, ComponentKind, ComponentState, ComponentStatus, Constants, Fault};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub lifespan: u32,
    pub state: ComponentState,
    pub maintenance_due: bool,
}

/// What a single `degrade` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Already failed; nothing changed.
    Dormant,
    Worn,
    /// Lifespan hit the warning value this cycle.
    MaintenanceDue,
    Failed(Fault),
}

impl Component {
    pub fn new(id: ComponentId, kind: ComponentKind, lifespan: u32) -> Self {
        Self {
            id,
            kind,
            lifespan,
            state: ComponentState::Operational,
            maintenance_due: false,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.state.fault()
    }

    /// Advance one cycle of wear.
    ///
    /// The fault is drawn before anything is mutated, so a catalog error
    /// leaves the component exactly as it was.
    pub fn degrade(
        &mut self,
        catalog: &FaultCatalog,
        constants: &Constants,
        rng: &mut impl Rng,
    ) -> Result<Degradation> {
        if self.is_failed() {
            return Ok(Degradation::Dormant);
        }

        let lifespan = self.lifespan.saturating_sub(1);
        if lifespan == 0 {
            let fault = catalog.draw(self.kind, rng)?;
            self.lifespan = 0;
            self.state = ComponentState::Failed {
                fault: fault.clone(),
            };
            return Ok(Degradation::Failed(fault));
        }

        self.lifespan = lifespan;
        // Strict equality: a component that jumps past the warning value never raises it.
        if lifespan == constants.maintenance_warning_lifespan && !self.maintenance_due {
            self.maintenance_due = true;
            return Ok(Degradation::MaintenanceDue);
        }
        Ok(Degradation::Worn)
    }

    /// Corrective repair: fresh random lifespan, back to operational.
    pub fn repair(&mut self, constants: &Constants, rng: &mut impl Rng) {
        self.lifespan =
            rng.gen_range(constants.repair_lifespan_min..=constants.repair_lifespan_max);
        self.state = ComponentState::Operational;
        self.maintenance_due = false;
    }

    /// Preventive path: extend lifespan by `boost` and clear the warning.
    pub fn service(&mut self, boost: u32) {
        self.lifespan = self.lifespan.saturating_add(boost);
        self.state = ComponentState::Operational;
        self.maintenance_due = false;
    }

    pub fn status(&self) -> ComponentStatus {
        ComponentStatus {
            id: self.id.clone(),
            kind: self.kind,
            name: self.kind.label().to_string(),
            lifespan: self.lifespan,
            failed: self.is_failed(),
            fault: self.fault().cloned(),
            maintenance_due: self.maintenance_due,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_content, make_rng};

    fn component(lifespan: u32) -> Component {
        Component::new(
            ComponentId("0-ram".to_string()),
            ComponentKind::Ram,
            lifespan,
        )
    }

    #[test]
    fn degrade_decrements_lifespan() {
        let content = base_content();
        let mut rng = make_rng();
        let mut c = component(8);
        let outcome = c
            .degrade(&content.fault_catalog, &content.constants, &mut rng)
            .unwrap();
        assert_eq!(outcome, Degradation::Worn);
        assert_eq!(c.lifespan, 7);
        assert!(!c.is_failed());
    }

    #[test]
    fn degrade_to_zero_fails_with_catalog_fault() {
        let content = base_content();
        let mut rng = make_rng();
        let mut c = component(1);
        let outcome = c
            .degrade(&content.fault_catalog, &content.constants, &mut rng)
            .unwrap();
        let Degradation::Failed(fault) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(c.lifespan, 0);
        assert_eq!(c.fault(), Some(&fault));
        assert!(content
            .fault_catalog
            .lookup(ComponentKind::Ram)
            .unwrap()
            .contains(&fault));
    }

    #[test]
    fn degrade_on_failed_component_is_noop() {
        let content = base_content();
        let mut rng = make_rng();
        let mut c = component(1);
        c.degrade(&content.fault_catalog, &content.constants, &mut rng)
            .unwrap();
        let before = c.clone();
        for _ in 0..3 {
            let outcome = c
                .degrade(&content.fault_catalog, &content.constants, &mut rng)
                .unwrap();
            assert_eq!(outcome, Degradation::Dormant);
        }
        assert_eq!(c.lifespan, before.lifespan);
        assert_eq!(c.state, before.state);
    }

    #[test]
    fn maintenance_due_raised_at_exactly_warning_value() {
        let content = base_content();
        let mut rng = make_rng();
        let mut c = component(4);
        let outcome = c
            .degrade(&content.fault_catalog, &content.constants, &mut rng)
            .unwrap();
        assert_eq!(outcome, Degradation::MaintenanceDue);
        assert!(c.maintenance_due);

        let outcome = c
            .degrade(&content.fault_catalog, &content.constants, &mut rng)
            .unwrap();
        assert_eq!(outcome, Degradation::Worn);
        assert!(c.maintenance_due, "flag stays set until serviced");
    }

    #[test]
    fn maintenance_due_not_raised_when_skipping_past_warning() {
        let content = base_content();
        let mut rng = make_rng();
        let mut c = component(3);
        c.degrade(&content.fault_catalog, &content.constants, &mut rng)
            .unwrap();
        assert_eq!(c.lifespan, 2);
        assert!(!c.maintenance_due);
    }

    #[test]
    fn repair_restores_operational_in_range() {
        let content = base_content();
        let mut rng = make_rng();
        for _ in 0..50 {
            let mut c = component(1);
            c.maintenance_due = true;
            c.degrade(&content.fault_catalog, &content.constants, &mut rng)
                .unwrap();
            c.repair(&content.constants, &mut rng);
            assert!(!c.is_failed());
            assert!(c.fault().is_none());
            assert!((5..=15).contains(&c.lifespan), "lifespan {}", c.lifespan);
            assert!(!c.maintenance_due);
        }
    }

    #[test]
    fn service_extends_and_clears_warning() {
        let mut c = component(3);
        c.maintenance_due = true;
        c.service(12);
        assert_eq!(c.lifespan, 15);
        assert!(!c.maintenance_due);
        assert_eq!(c.state, ComponentState::Operational);
    }

    #[test]
    fn failed_iff_fault_present() {
        let content = base_content();
        let mut rng = make_rng();
        let mut c = component(2);
        for _ in 0..4 {
            assert_eq!(c.is_failed(), c.fault().is_some());
            c.degrade(&content.fault_catalog, &content.constants, &mut rng)
                .unwrap();
        }
        assert!(c.is_failed());
        assert_eq!(c.is_failed(), c.fault().is_some());
    }
}
