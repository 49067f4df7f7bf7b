//! Replaying the shipped demo session and exporting its history.

use money_scanner::export::{self, HistorySnapshot};
use money_scanner::registry::DenominationRegistry;
use money_scanner::replay::{parse_script, ReplayRunner};
use rust_decimal_macros::dec;

use crate::common::Rig;

const DEMO: &str = include_str!("../../sessions/demo.replay");

#[test]
fn test_demo_session() {
    let rig = Rig::new(DenominationRegistry::default(), true);
    let steps = parse_script(DEMO).unwrap();
    let runner = ReplayRunner::new(rig.hub.clone(), rig.clock.clone(), rig.toggle.clone());
    let summary = runner.run(&rig.scanner, &steps);

    // 20 at 0.0, 20 at 0.9, 5 at 2.0, then two manual 50s.
    assert_eq!(summary.additions, 5);
    assert_eq!(summary.final_total, dec!(145));
    assert_eq!(rig.total.text(), "Total: 145");
    assert_eq!(rig.detected.text(), "Detected: —");
}

#[test]
fn test_export_after_replay() {
    let rig = Rig::ab(true);
    let steps = parse_script("0 status A TRACKED\n1 status B TRACKED\n").unwrap();
    ReplayRunner::new(rig.hub.clone(), rig.clock.clone(), rig.toggle.clone()).run(&rig.scanner, &steps);

    let mut path = std::env::temp_dir();
    path.push(format!("money_scanner_it_{}.json", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().to_string();

    {
        let scanner = rig.scanner.borrow();
        export::save_history(&HistorySnapshot::new(scanner.total(), scanner.history()), Some(&path))
            .unwrap();
    }

    let loaded = export::load_history(Some(&path)).unwrap().unwrap();
    assert_eq!(loaded.total, dec!(15));
    let targets: Vec<&str> = loaded.entries.iter().map(|e| e.target_id.as_str()).collect();
    assert_eq!(targets, vec!["A", "B"]);

    std::fs::remove_file(&path).unwrap();
}
