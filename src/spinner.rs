//! Spinner orchestration: owns the reels and the session, schedules reel launches,
//! reacts to sprite events (warm-up flip, armed stop) and resolves the round once
//! every reel has come to rest.
//!
//! The machine is host-agnostic: the browser glue calls [`SlotMachine::frame`]
//! once per `requestAnimationFrame` and renders whatever the reels report.

use crate::combos::ComboTable;
use crate::config::SpinnerConfig;
use crate::rng::RandomSource;
use crate::session::{BetError, ReelId, RoundOutcome, Session, parse_bet};
use crate::sprite::{Direction, SpriteEvent, VerticalSprite};

/// Result of asking the machine to spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A round is still in flight; the request was ignored.
    Busy,
}

/// Machine-level notifications produced by [`SlotMachine::frame`] and
/// [`SlotMachine::start_round`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MachineEvent {
    RoundStarted { bet: u32, targets: Vec<usize> },
    ReelStarted(ReelId),
    ReelFlipped(ReelId),
    ReelArmed { reel: ReelId, frame: usize },
    ReelStopped { reel: ReelId, frame: usize },
    RoundResolved(RoundOutcome),
}

/// A reel: its sprite plus a pending launch time, if scheduled.
#[derive(Debug)]
pub struct Reel {
    id: ReelId,
    sprite: VerticalSprite,
    launch_at: Option<f64>,
}

impl Reel {
    pub fn id(&self) -> ReelId {
        self.id
    }
    pub fn sprite(&self) -> &VerticalSprite {
        &self.sprite
    }
    pub fn is_pending(&self) -> bool {
        self.launch_at.is_some()
    }
}

#[derive(Debug)]
pub struct SlotMachine {
    reels: Vec<Reel>,
    session: Session,
    combos: ComboTable,
    flip_after: u32,
    stop_after: u32,
    start_delay_ms: f64,
    stagger_ms: f64,
}

impl SlotMachine {
    pub fn new(config: &SpinnerConfig) -> Self {
        let reels = (0..config.reel_count())
            .map(|i| Reel {
                id: ReelId(i),
                sprite: VerticalSprite::new(config.sprite_options(i)),
                launch_at: None,
            })
            .collect();
        Self {
            reels,
            session: Session::new(config.starting_credits, config.default_bet),
            combos: config.combos.clone(),
            flip_after: config.flip_after,
            stop_after: config.stop_after(),
            start_delay_ms: config.start_delay_ms,
            stagger_ms: config.stagger_ms,
        }
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }
    pub fn session(&self) -> &Session {
        &self.session
    }
    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// Start a round from raw bet input. Busy rounds are ignored before the
    /// input is looked at.
    pub fn start_round_from_input(
        &mut self,
        bet_input: &str,
        rng: &mut dyn RandomSource,
        now_ms: f64,
    ) -> Result<(StartOutcome, Vec<MachineEvent>), BetError> {
        if !self.session.is_ready() {
            return Ok((StartOutcome::Busy, Vec::new()));
        }
        let bet = parse_bet(bet_input)?;
        self.start_round(bet, rng, now_ms)
    }

    /// Draw every reel's target, lock the session and schedule the launches.
    pub fn start_round(
        &mut self,
        bet: u32,
        rng: &mut dyn RandomSource,
        now_ms: f64,
    ) -> Result<(StartOutcome, Vec<MachineEvent>), BetError> {
        if bet == 0 {
            return Err(BetError::NotPositive(0));
        }
        if !self.session.begin_round(bet) {
            log::debug!("spin ignored, round in progress");
            return Ok((StartOutcome::Busy, Vec::new()));
        }

        let mut targets = Vec::with_capacity(self.reels.len());
        for (i, reel) in self.reels.iter_mut().enumerate() {
            // the last frame of the strip is never a result
            let target = rng.up_to(reel.sprite.frames().saturating_sub(2));
            self.session.set_result(reel.id, target);
            targets.push(target);
            reel.sprite.set_direction(Direction::Forward);
            reel.launch_at = Some(now_ms + self.start_delay_ms + i as f64 * self.stagger_ms);
        }
        log::info!("round started: bet {} targets {:?}", bet, targets);
        Ok((StartOutcome::Started, vec![MachineEvent::RoundStarted { bet, targets }]))
    }

    /// One host animation frame.
    pub fn frame(&mut self, now_ms: f64) -> Vec<MachineEvent> {
        let mut out = Vec::new();
        let mut any_stopped = false;

        for reel in self.reels.iter_mut() {
            if let Some(at) = reel.launch_at {
                if now_ms >= at {
                    reel.launch_at = None;
                    reel.sprite.start();
                }
            }
            if reel.sprite.is_running() {
                reel.sprite.animate();
            }

            // reacting can queue more events (flip), so drain until quiet
            loop {
                let events = reel.sprite.drain_events();
                if events.is_empty() {
                    break;
                }
                for (event, key_frames) in events {
                    match event {
                        SpriteEvent::Start => out.push(MachineEvent::ReelStarted(reel.id)),
                        SpriteEvent::Update if key_frames == self.stop_after => {
                            if let Some(frame) = self.session.result_for(reel.id) {
                                reel.sprite.stop_on_frame(frame);
                                log::debug!("{} armed to stop on frame {}", reel.id, frame);
                                out.push(MachineEvent::ReelArmed { reel: reel.id, frame });
                            }
                        }
                        SpriteEvent::Update if key_frames == self.flip_after => {
                            reel.sprite.flip_direction();
                        }
                        SpriteEvent::Flipped => out.push(MachineEvent::ReelFlipped(reel.id)),
                        SpriteEvent::Stop => {
                            let frame = reel.sprite.current_frame();
                            log::debug!("{} stopped on frame {}", reel.id, frame);
                            out.push(MachineEvent::ReelStopped { reel: reel.id, frame });
                            any_stopped = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if any_stopped {
            if let Some(outcome) = self.resolve_if_done() {
                out.push(MachineEvent::RoundResolved(outcome));
            }
        }
        out
    }

    /// Settle the round once every reel is idle. No-op while any reel is still
    /// spinning or waiting to launch, or when no round is in flight.
    fn resolve_if_done(&mut self) -> Option<RoundOutcome> {
        if self.session.is_ready() {
            return None;
        }
        if self.reels.iter().any(|r| r.sprite.is_running() || r.is_pending()) {
            return None;
        }
        let frames: Vec<usize> = self
            .reels
            .iter()
            .map(|r| self.session.result_for(r.id).unwrap_or_else(|| r.sprite.current_frame()))
            .collect();
        let resolution = self.combos.resolve(&frames);
        let outcome = self.session.settle(frames, resolution);
        log::info!(
            "round resolved: {} (x{}) credits now {}",
            outcome.name,
            outcome.multiplier,
            outcome.credits
        );
        Some(outcome)
    }
}
