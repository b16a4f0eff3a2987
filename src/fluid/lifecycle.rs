// Render-loop lifecycle.
//
//   Idle ──start──▶ Initializing ──surface_ready(true)──▶ Running ⇄ Suspended
//     │                 ▲   └──surface_ready(false)──▶ Unsupported
//     ├─(defer)─▶ Deferred ──signal_ready──┘
//     └─(reduced motion)─▶ Disabled
//   any ──dispose──▶ Disposed
//
// The platform side (idle callbacks, animation frames, listeners, the GPU
// surface) sits behind `Host`, so every transition can be driven without a
// browser.

/// Platform operations the lifecycle drives. Each is called at most once per
/// matching acquire/release pair.
pub trait Host {
    /// Queue initialization at low priority (idle callback or short timer).
    fn schedule_init(&mut self);
    fn cancel_init(&mut self);
    /// Ask for one animation frame; the platform calls `Lifecycle::on_frame` back.
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
    fn attach_listeners(&mut self);
    fn detach_listeners(&mut self);
    /// Drop GPU buffers, pipelines and the canvas.
    fn release_surface(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Deferred,
    Initializing,
    Running,
    Suspended,
    /// Reduced motion: nothing is ever created.
    Disabled,
    /// The GPU surface could not be created; the fallback colour shows.
    Unsupported,
    Disposed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Deferred => "deferred",
            Phase::Initializing => "initializing",
            Phase::Running => "running",
            Phase::Suspended => "suspended",
            Phase::Disabled => "disabled",
            Phase::Unsupported => "unsupported",
            Phase::Disposed => "disposed",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartOptions {
    pub reduced_motion: bool,
    pub defer: bool,
}

/// Independent reasons for the loop to be parked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Suspension {
    pub hidden: bool,
    pub context_lost: bool,
    pub paused: bool,
}

impl Suspension {
    #[inline]
    pub fn any(&self) -> bool {
        self.hidden || self.context_lost || self.paused
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot {action} while {phase:?}")]
    IllegalTransition { phase: Phase, action: &'static str },
}

pub struct Lifecycle<H: Host> {
    host: H,
    phase: Phase,
    suspension: Suspension,
    ready_signalled: bool,
    init_pending: bool,
    frame_pending: bool,
    listeners_attached: bool,
    surface_live: bool,
}

impl<H: Host> Lifecycle<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            phase: Phase::Idle,
            suspension: Suspension::default(),
            ready_signalled: false,
            init_pending: false,
            frame_pending: false,
            listeners_attached: false,
            surface_live: false,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn suspension(&self) -> Suspension {
        self.suspension
    }

    #[inline]
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn set_phase(&mut self, next: Phase) {
        if self.phase != next {
            log::debug!("[lifecycle] {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    pub fn start(&mut self, opts: StartOptions) -> Result<Phase, LifecycleError> {
        if self.phase != Phase::Idle {
            return Err(LifecycleError::IllegalTransition {
                phase: self.phase,
                action: "start",
            });
        }
        if opts.reduced_motion {
            log::info!("[lifecycle] reduced motion preferred; background stays static");
            self.set_phase(Phase::Disabled);
        } else if opts.defer && !self.ready_signalled {
            self.set_phase(Phase::Deferred);
        } else {
            self.enter_initializing();
        }
        Ok(self.phase)
    }

    /// The page finished its entrance; a deferred start may proceed. A signal
    /// that arrives before `start` is remembered.
    pub fn signal_ready(&mut self) {
        self.ready_signalled = true;
        if self.phase == Phase::Deferred {
            self.enter_initializing();
        }
    }

    fn enter_initializing(&mut self) {
        self.set_phase(Phase::Initializing);
        self.init_pending = true;
        self.host.schedule_init();
    }

    /// The scheduled init callback fired. Returns true if the caller should go
    /// ahead and create the surface.
    pub fn begin_init(&mut self) -> bool {
        self.init_pending = false;
        if self.phase != Phase::Initializing {
            return false;
        }
        // From here on the host may hold a canvas that dispose must remove
        self.surface_live = true;
        true
    }

    /// Surface creation finished. Returns false if the result was not adopted
    /// (disposed meanwhile, or creation failed); the caller then drops it.
    pub fn surface_ready(&mut self, ok: bool) -> bool {
        if self.phase != Phase::Initializing {
            return false;
        }
        if !ok {
            log::warn!("[lifecycle] GPU surface unavailable; keeping static background");
            if self.surface_live {
                self.host.release_surface();
                self.surface_live = false;
            }
            self.set_phase(Phase::Unsupported);
            return false;
        }
        self.surface_live = true;
        self.listeners_attached = true;
        self.host.attach_listeners();
        self.set_phase(Phase::Suspended);
        self.refresh_running();
        true
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.suspension.hidden = hidden;
        self.refresh_running();
    }

    /// GPU context lost. The state is kept; only the loop stops.
    pub fn context_lost(&mut self) {
        self.suspension.context_lost = true;
        self.refresh_running();
    }

    pub fn context_restored(&mut self) {
        self.suspension.context_lost = false;
        self.refresh_running();
    }

    pub fn pause(&mut self) {
        self.suspension.paused = true;
        self.refresh_running();
    }

    pub fn resume(&mut self) {
        self.suspension.paused = false;
        self.refresh_running();
    }

    fn refresh_running(&mut self) {
        if !matches!(self.phase, Phase::Running | Phase::Suspended) {
            return;
        }
        if self.suspension.any() {
            if self.frame_pending {
                self.host.cancel_frame();
                self.frame_pending = false;
            }
            self.set_phase(Phase::Suspended);
        } else {
            self.set_phase(Phase::Running);
            self.schedule_frame();
        }
    }

    fn schedule_frame(&mut self) {
        if !self.frame_pending {
            self.frame_pending = true;
            self.host.request_frame();
        }
    }

    /// An animation frame fired. Returns true if this frame should be drawn;
    /// the next frame is already requested in that case.
    pub fn on_frame(&mut self) -> bool {
        self.frame_pending = false;
        if self.phase != Phase::Running {
            return false;
        }
        self.schedule_frame();
        true
    }

    /// Tear everything down. Safe to call in any phase, any number of times.
    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        if self.init_pending {
            self.host.cancel_init();
            self.init_pending = false;
        }
        if self.frame_pending {
            self.host.cancel_frame();
            self.frame_pending = false;
        }
        if self.listeners_attached {
            self.host.detach_listeners();
            self.listeners_attached = false;
        }
        if self.surface_live {
            self.host.release_surface();
            self.surface_live = false;
        }
        self.set_phase(Phase::Disposed);
    }
}
