// Integration tests (native) for the `dread-spinner` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use dread_spinner::{
    ComboTable, Direction, MachineEvent, SequenceRng, SlotMachine, SpinnerConfig, SpriteEvent,
    SpriteOptions, StartOutcome, VerticalSprite,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn play_round(m: &mut SlotMachine, targets: &[usize], t0: f64) -> dread_spinner::RoundOutcome {
    let mut rng = SequenceRng::for_indices(targets, 2);
    let (outcome, _) = m.start_round(m.session().bet(), &mut rng, t0).unwrap();
    assert_eq!(outcome, StartOutcome::Started);
    for n in 0..2_000 {
        for e in m.frame(t0 + n as f64 * FRAME_MS) {
            if let MachineEvent::RoundResolved(o) = e {
                return o;
            }
        }
    }
    panic!("round never resolved");
}

// Resolver reference cases: [0,0,0] -> 1x, [2,1,0] -> 3x, [1,0,2] -> loss
#[test]
fn resolver_reference_cases() {
    let table = ComboTable::default();
    assert_eq!(table.resolve(&[0, 0, 0]).multiplier, 1);
    assert_eq!(table.resolve(&[2, 1, 0]).multiplier, 3);
    assert_eq!(table.resolve(&[1, 0, 2]).multiplier, -1);
}

#[test]
fn full_rounds_settle_credits() {
    let mut m = SlotMachine::new(&SpinnerConfig::default());
    assert_eq!(play_round(&mut m, &[0, 0, 0], 0.0).credits, 155);
    assert_eq!(play_round(&mut m, &[1, 0, 2], 20_000.0).credits, 150);
    assert_eq!(play_round(&mut m, &[0, 1, 2], 40_000.0).credits, 160);
    for (reel, frame) in m.reels().iter().zip([0, 1, 2]) {
        assert_eq!(reel.sprite().current_frame(), frame);
    }
}

#[test]
fn targets_never_use_the_last_frame() {
    let mut m = SlotMachine::new(&SpinnerConfig::default());
    let mut rng = dread_spinner::SeededRng::new(7);
    for round in 0..20 {
        let (outcome, events) = m.start_round(1, &mut rng, round as f64 * 20_000.0).unwrap();
        assert_eq!(outcome, StartOutcome::Started);
        let Some(MachineEvent::RoundStarted { targets, .. }) = events.first() else {
            panic!("missing RoundStarted");
        };
        assert!(targets.iter().all(|&t| t <= 2), "{:?}", targets);
        let t0 = round as f64 * 20_000.0;
        let mut resolved = false;
        for n in 0..2_000 {
            if m.frame(t0 + n as f64 * FRAME_MS)
                .iter()
                .any(|e| matches!(e, MachineEvent::RoundResolved(_)))
            {
                resolved = true;
                break;
            }
        }
        assert!(resolved);
    }
}

#[test]
fn sprite_lifecycle_through_public_api() {
    let mut s = VerticalSprite::new(SpriteOptions {
        frames: 4,
        start_frame: 1,
        direction: Direction::Reverse,
        ticks_per_key_frame: 1,
        ..SpriteOptions::default()
    });
    s.change_rate(35.0, 5);
    assert!(s.is_running());
    for _ in 0..30 {
        s.animate();
    }
    assert_eq!(s.velocity(), 35.0);
    s.stop_on_frame(3);
    for _ in 0..200 {
        s.animate();
    }
    assert!(!s.is_running());
    assert_eq!(s.current_frame(), 3);
    let events: Vec<SpriteEvent> = s.drain_events().into_iter().map(|(e, _)| e).collect();
    assert_eq!(events.first(), Some(&SpriteEvent::Start));
    assert!(events.contains(&SpriteEvent::RateChange));
    assert!(events.contains(&SpriteEvent::RateChangeDone));
    assert!(events.contains(&SpriteEvent::Stop));
}
