mod input;
mod screen;

use gloom::player::{PLAYER_MAX_HEALTH, PLAYER_ROT_SPEED};
use gloom::render::draw_game_id;
use gloom::{
    ConnectionState, HeldKeys, RenderSink, Renderer, Session, SessionEvent, Settings, Transport,
    WaitStatus, World, step,
};

pub use input::Key;
pub use screen::Screen;

/// Seconds the loading screen waits for the connection state to move.
pub const LOADING_TIMEOUT: f32 = 15.0;

/// Client-side game: the world, the protocol session and whatever screen
/// the player is looking at.
pub struct GameState {
    pub world: World,
    pub session: Session,
    renderer: Renderer,
    screen: Screen,
    keys: HeldKeys,
    pointer_locked: bool,
    update_pending: bool,
    sensitivity: f32,
    auto_ready: bool,
    ready_sent: bool,
    wait_status: Option<WaitStatus>,
    observed_state: ConnectionState,
    state_timer: f32,
}

impl GameState {
    pub fn new(settings: &Settings, auto_ready: bool) -> Self {
        let mut world = World::new();
        world.apply_settings(settings);
        Self {
            world,
            session: Session::new(),
            renderer: Renderer::new(),
            screen: Screen::Loading,
            keys: HeldKeys::empty(),
            pointer_locked: true,
            update_pending: false,
            sensitivity: settings.mouse_sensitivity_scale(),
            auto_ready,
            ready_sent: false,
            wait_status: None,
            observed_state: ConnectionState::Disconnected,
            state_timer: 0.0,
        }
    }

    /// Begins talking to `game_id`; the loading screen joins once connected.
    pub fn connect(&mut self, game_id: u32, token: u32) {
        self.session.init(game_id, token);
        self.switch_screen(Screen::Loading);
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn keys(&self) -> HeldKeys {
        self.keys
    }

    pub fn wait_status(&self) -> Option<WaitStatus> {
        self.wait_status
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.world.apply_settings(settings);
        self.sensitivity = settings.mouse_sensitivity_scale();
    }

    fn switch_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            log::debug!("switching screen from {} to {}", self.screen, screen);
            self.screen = screen;
        }
    }

    pub fn on_key(&mut self, key: Key, pressed: bool) {
        if key == Key::Menu {
            if pressed {
                match self.screen {
                    Screen::Game => self.pause(),
                    Screen::Pause => self.resume(),
                    _ => {}
                }
            }
            return;
        }
        // Keys only count during play so prediction never moves unreported
        if self.screen != Screen::Game || !self.pointer_locked {
            return;
        }
        if input::apply_key(&mut self.keys, key, pressed) {
            self.update_pending = true;
        }
    }

    pub fn on_mouse_moved(&mut self, dx: f32) {
        if self.screen != Screen::Game || !self.pointer_locked {
            return;
        }
        self.world.rotate_player(dx * self.sensitivity * PLAYER_ROT_SPEED);
        self.update_pending = true;
    }

    pub fn on_mouse_down(&mut self, transport: &mut impl Transport) {
        if self.screen == Screen::Game && self.world.player.is_alive() {
            let _ = self.session.fire(transport);
        }
    }

    /// Losing the pointer during play stops the player and pauses.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked && self.screen == Screen::Game {
            self.pause();
        }
    }

    fn pause(&mut self) {
        if !self.keys.is_empty() {
            self.keys = HeldKeys::empty();
            self.update_pending = true;
        }
        self.switch_screen(Screen::Pause);
    }

    pub fn resume(&mut self) {
        if self.screen == Screen::Pause {
            self.pointer_locked = true;
            self.switch_screen(Screen::Game);
        }
    }

    /// Tells the server we are leaving.
    pub fn exit(&mut self, transport: &mut impl Transport) {
        if self.session.state() != ConnectionState::Disconnected {
            let _ = self.session.leave(transport);
        }
    }

    pub fn on_transport_closed(&mut self) {
        log::warn!("transport closed");
        self.session.set_state(ConnectionState::Disconnected);
    }

    pub fn on_packet(&mut self, bytes: &[u8], now: f32) {
        let Ok(events) = self.session.receive(&mut self.world, bytes, now) else {
            return;
        };
        for event in events {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::MatchStarted => {
                self.wait_status = None;
                self.renderer.reset_health(PLAYER_MAX_HEALTH);
                if self.screen == Screen::Waiting {
                    self.switch_screen(if self.pointer_locked {
                        Screen::Game
                    } else {
                        Screen::Pause
                    });
                }
            }
            SessionEvent::Wait(status) => self.wait_status = Some(status),
            SessionEvent::LocalPlayerKilled { killer } => {
                log::info!("killed by player {}", killer);
                self.keys = HeldKeys::empty();
                self.switch_screen(Screen::Over { dead: true });
            }
            SessionEvent::HitScored { victim } => log::info!("hit player {}", victim),
            SessionEvent::Damaged { health } => log::debug!("health down to {}", health),
            SessionEvent::LastPlayerStanding => {
                if self.screen != Screen::Waiting && !self.screen.is_over() {
                    log::info!("last player standing");
                    self.switch_screen(Screen::Over { dead: false });
                }
            }
            SessionEvent::Terminated => {
                if !self.screen.is_over() {
                    self.switch_screen(Screen::Error);
                }
            }
        }
    }

    /// Runs one frame of the current screen and draws it.
    pub fn tick(
        &mut self,
        delta: f32,
        now: f32,
        transport: &mut impl Transport,
        sink: &mut impl RenderSink,
    ) {
        match self.screen {
            Screen::Loading => self.tick_loading(delta, transport),
            Screen::Waiting => {
                if self.auto_ready && !self.ready_sent {
                    self.ready_sent = self.session.set_ready(transport, true).is_ok();
                }
                step(&mut self.world, HeldKeys::empty(), delta);
            }
            Screen::Game => {
                if self.update_pending {
                    self.update_pending = false;
                    self.send_update(transport, now);
                }
                step(&mut self.world, self.keys, delta);
            }
            Screen::Pause => {
                if self.update_pending {
                    self.update_pending = false;
                    self.send_update(transport, now);
                }
                step(&mut self.world, HeldKeys::empty(), delta);
            }
            Screen::Over { dead } => {
                if dead {
                    self.follow_tracked();
                }
                step(&mut self.world, HeldKeys::empty(), delta);
            }
            Screen::Error => {}
        }

        if self.session.state() == ConnectionState::Disconnected && !self.screen.is_final() {
            self.switch_screen(Screen::Error);
        }

        self.renderer.set_alpha(self.screen.alpha());
        self.renderer.render(&mut self.world, sink);
        if self.screen.shows_game_id() {
            draw_game_id(self.session.game_id(), sink);
        }
    }

    fn tick_loading(&mut self, delta: f32, transport: &mut impl Transport) {
        let state = self.session.state();
        if state != self.observed_state {
            self.observed_state = state;
            self.state_timer = 0.0;
        }
        self.state_timer += delta;

        match state {
            ConnectionState::Connected => {
                let _ = self.session.join(transport);
            }
            ConnectionState::Waiting | ConnectionState::Updating => {
                self.switch_screen(Screen::Waiting);
                return;
            }
            ConnectionState::Disconnected | ConnectionState::Joining => {}
        }

        if self.state_timer > LOADING_TIMEOUT {
            log::warn!("no answer from the server after {} seconds", LOADING_TIMEOUT);
            self.session.set_state(ConnectionState::Disconnected);
        }
    }

    fn send_update(&mut self, transport: &mut impl Transport, now: f32) {
        let rotation = self.world.player.rotation;
        self.session.record_input(&self.world.player, self.keys, now);
        let _ = self.session.send_update(transport, self.keys, rotation, now);
    }

    fn follow_tracked(&mut self) {
        let Some(target) = self.world.sprites.tracked() else {
            return;
        };
        let (position, rotation) = (target.position, target.rotation);
        self.world.player.position = position;
        self.world.set_player_rotation(rotation);
    }
}
