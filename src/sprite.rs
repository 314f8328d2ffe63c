//! Vertical sprite animator driving a single reel.
//!
//! A reel is a tall strip image of `frames` equally sized frames stacked
//! vertically. The animator scrolls a window of one frame height over that strip,
//! advancing by `velocity` pixels on every key frame (one key frame every
//! `ticks_per_key_frame` host ticks). Lifecycle changes are reported as typed
//! [`SpriteEvent`]s queued on the sprite and drained by the owner after each tick,
//! so the owner can react (flip, arm a stop) without re-entering the sprite.

/// Scroll direction along the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward, // position increases
    Reverse, // position decreases
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Lifecycle notifications raised by a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteEvent {
    Start,
    Stop,
    RateChange,
    RateChangeDone,
    RateSet,
    Flipped,
    /// A key frame completed during `animate`.
    Update,
}

/// Observable phase of the animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteState {
    Idle,
    Running,
    /// Running with a stop frame armed.
    Stopping,
}

/// Sub-region of the strip to blit into the destination canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Construction parameters for a [`VerticalSprite`].
#[derive(Clone, Debug)]
pub struct SpriteOptions {
    pub frame_width: f64,
    pub frame_height: f64,
    pub frames: usize,
    pub start_frame: usize,
    pub direction: Direction,
    pub pixels_per_key_frame: f64,
    pub ticks_per_key_frame: u32,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            frame_width: 200.0,
            frame_height: 430.0,
            frames: 4,
            start_frame: 0,
            direction: Direction::Forward,
            pixels_per_key_frame: 70.0,
            ticks_per_key_frame: 2,
        }
    }
}

#[derive(Debug)]
pub struct VerticalSprite {
    options: SpriteOptions,
    height: f64,           // frames * frame_height
    rate: f64,             // configured pixels per key frame (changed by set_rate)
    direction: Direction,
    pos: f64,              // top of the visible window within the strip
    velocity: f64,         // current pixels per key frame
    desired_velocity: f64, // ramp target
    ramp_step: f64,        // per key frame velocity increment while ramping
    stop_at: Option<usize>,
    tick_count: u32,
    key_frames: u32,
    running: bool,
    events: Vec<(SpriteEvent, u32)>,
}

impl VerticalSprite {
    pub fn new(mut options: SpriteOptions) -> Self {
        options.frames = options.frames.max(1);
        options.start_frame = options.start_frame.min(options.frames - 1);
        let height = options.frames as f64 * options.frame_height;
        let mut sprite = Self {
            rate: options.pixels_per_key_frame,
            direction: options.direction,
            height,
            options,
            pos: 0.0,
            velocity: 0.0,
            desired_velocity: 0.0,
            ramp_step: 0.0,
            stop_at: None,
            tick_count: 0,
            key_frames: 0,
            running: false,
            events: Vec::new(),
        };
        sprite.reset();
        sprite
    }

    /// Restore the freshly constructed state (position, rate, direction, counters).
    pub fn reset(&mut self) {
        self.rate = self.options.pixels_per_key_frame;
        self.velocity = self.rate;
        self.desired_velocity = self.rate;
        self.direction = self.options.direction;
        self.stop_at = None;
        self.ramp_step = 0.0;
        self.tick_count = 0;
        self.key_frames = 0;
        self.running = false;
        self.pos = self.start_pos();
    }

    pub fn start(&mut self) {
        self.running = true;
        self.stop_at = None;
        self.velocity = self.rate;
        self.desired_velocity = self.rate;
        self.ramp_step = 0.0;
        self.key_frames = 0;
        self.tick_count = 0;
        self.emit(SpriteEvent::Start);
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.emit(SpriteEvent::Stop);
    }

    /// Advance by one host tick. Movement only happens on key frames.
    pub fn update(&mut self) {
        self.tick_count += 1;
        if self.tick_count < self.options.ticks_per_key_frame {
            return;
        }
        self.tick_count = 0;
        self.key_frames += 1;

        if self.desired_velocity != self.velocity {
            self.velocity += self.ramp_step;
            let passed = (self.ramp_step < 0.0 && self.velocity < self.desired_velocity)
                || (self.ramp_step > 0.0 && self.velocity > self.desired_velocity);
            if passed || self.velocity == self.desired_velocity {
                self.velocity = self.desired_velocity;
                self.emit(SpriteEvent::RateChangeDone);
            }
        }

        if let Some(frame) = self.stop_at {
            let target = frame as f64 * self.options.frame_height;
            if (self.pos - target).abs() <= self.velocity.abs() {
                self.pos = target;
                self.stop();
                return;
            }
        }

        let next = match self.direction {
            Direction::Forward => (self.pos + self.velocity).ceil(),
            Direction::Reverse => (self.pos - self.velocity).ceil(),
        };
        if next >= 0.0 && next <= self.max_pos() {
            self.pos = next;
        } else {
            // wrap to the opposite end of the strip
            self.pos = match self.direction {
                Direction::Forward => 0.0,
                Direction::Reverse => self.max_pos(),
            };
        }
    }

    /// One host animation frame: update and report a completed key frame.
    pub fn animate(&mut self) {
        self.update();
        if self.tick_count == 0 {
            self.emit(SpriteEvent::Update);
        }
    }

    /// Ramp linearly to `rate` over `steps` key frames. Starts the sprite if idle.
    pub fn change_rate(&mut self, rate: f64, steps: u32) {
        if !self.running {
            self.start();
        }
        self.desired_velocity = rate;
        let step = (self.desired_velocity - self.velocity) / steps.max(1) as f64;
        // round away from zero so the ramp always terminates
        self.ramp_step = if step < 0.0 { step.floor() } else { step.ceil() };
        self.emit(SpriteEvent::RateChange);
    }

    /// Jump straight to `rate` (also becomes the rate used by the next `start`).
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
        self.velocity = rate;
        self.desired_velocity = rate;
        self.emit(SpriteEvent::RateSet);
    }

    pub fn flip_direction(&mut self) {
        self.direction = self.direction.flipped();
        self.emit(SpriteEvent::Flipped);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Arm a stop on `frame`, clamped to the last frame of the strip.
    pub fn stop_on_frame(&mut self, frame: usize) {
        self.stop_at = Some(frame.min(self.options.frames - 1));
    }

    pub fn current_frame(&self) -> usize {
        (self.pos / self.options.frame_height).floor() as usize
    }

    pub fn source_rect(&self) -> SourceRect {
        SourceRect {
            x: 0.0,
            y: self.pos,
            width: self.options.frame_width,
            height: self.options.frame_height,
        }
    }

    pub fn state(&self) -> SpriteState {
        match (self.running, self.stop_at) {
            (false, _) => SpriteState::Idle,
            (true, None) => SpriteState::Running,
            (true, Some(_)) => SpriteState::Stopping,
        }
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<(SpriteEvent, u32)> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn position(&self) -> f64 {
        self.pos
    }
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn key_frames(&self) -> u32 {
        self.key_frames
    }
    pub fn frames(&self) -> usize {
        self.options.frames
    }
    pub fn frame_height(&self) -> f64 {
        self.options.frame_height
    }
    pub fn height(&self) -> f64 {
        self.height
    }
    pub fn max_pos(&self) -> f64 {
        self.height - self.options.frame_height
    }

    fn start_pos(&self) -> f64 {
        self.options.start_frame as f64 * self.options.frame_height
    }

    fn emit(&mut self, event: SpriteEvent) {
        self.events.push((event, self.key_frames));
    }
}
