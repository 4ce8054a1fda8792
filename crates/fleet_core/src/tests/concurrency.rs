use super::*;
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn test_concurrent_maintenance_and_ticks_lose_no_update() {
    let content = Arc::new(base_content());
    let env = Arc::new(Mutex::new(environment_with(&[[50; 5], [50; 5], [50; 5]])));
    let rng = Arc::new(Mutex::new(make_rng()));
    const TICKS: u32 = 5;

    let mut handles = Vec::new();
    for machine in 0..3u32 {
        for kind in ComponentKind::ALL {
            let env = Arc::clone(&env);
            let rng = Arc::clone(&rng);
            let content = Arc::clone(&content);
            handles.push(thread::spawn(move || {
                let id = component_id(machine, kind);
                let mut rng = rng.lock().unwrap();
                let mut env = env.lock().unwrap();
                let report = env.preventive_maintenance(&id, &content, &mut *rng).unwrap();
                (id, report.lifespan_after - report.lifespan_before)
            }));
        }
    }
    let ticker = {
        let env = Arc::clone(&env);
        let rng = Arc::clone(&rng);
        let content = Arc::clone(&content);
        thread::spawn(move || {
            for _ in 0..TICKS {
                let mut rng = rng.lock().unwrap();
                let mut env = env.lock().unwrap();
                env.tick(&content, &mut *rng);
            }
        })
    };

    let boosts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ticker.join().unwrap();

    let env = env.lock().unwrap();
    assert_eq!(env.meta.tick, u64::from(TICKS));
    assert!(env.failure_history().is_empty());
    for (id, boost) in boosts {
        let machine = env.machines().iter().find(|m| m.component(&id).is_some()).unwrap();
        let lifespan = machine.component(&id).unwrap().lifespan;
        assert_eq!(lifespan, 50 - TICKS + boost, "{id}");
    }
}
