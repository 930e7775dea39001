//! Input router
//!
//! Turns named keys into engine commands. Key handling is split in two so the
//! mapping can be tested without an engine: [`InputRouter::command_for`] is
//! pure, [`Command::apply`] talks to the engine.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::settings::Settings;
use crate::sim::SpeedMode;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// F
    Fast,
    /// N
    Normal,
    /// S
    Stop,
}

impl Key {
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Left => "left",
            Key::Right => "right",
            Key::Fast => "f",
            Key::Normal => "n",
            Key::Stop => "s",
        }
    }

    /// Parse a key name or its letter; unknown keys map to `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "f" | "fast" => Some(Key::Fast),
            "n" | "normal" => Some(Key::Normal),
            "s" | "stop" => Some(Key::Stop),
            _ => None,
        }
    }
}

/// A state engine command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveBat(i32),
    SetSpeed(SpeedMode),
    Stop,
}

impl Command {
    pub fn apply(self, engine: &Engine) -> Result<(), EngineError> {
        match self {
            Command::MoveBat(direction) => {
                engine.move_bat(direction)?;
            }
            Command::SetSpeed(speed) => engine.set_speed(speed)?,
            Command::Stop => engine.stop()?,
        }
        Ok(())
    }
}

/// Key to command dispatch
#[derive(Debug, Clone, Copy)]
pub struct InputRouter {
    key_step: i32,
}

impl InputRouter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            key_step: settings.key_step,
        }
    }

    pub fn command_for(&self, key: Key) -> Command {
        match key {
            Key::Left => Command::MoveBat(-self.key_step),
            Key::Right => Command::MoveBat(self.key_step),
            Key::Fast => Command::SetSpeed(SpeedMode::Fast),
            Key::Normal => Command::SetSpeed(SpeedMode::Normal),
            Key::Stop => Command::Stop,
        }
    }

    /// Route a key to the engine
    pub fn handle_key(&self, key: Key, engine: &Engine) -> Result<Command, EngineError> {
        let command = self.command_for(key);
        log::debug!("key {} -> {:?}", key.as_str(), command);
        command.apply(engine)?;
        Ok(command)
    }

    /// Route a raw key name; unmapped names are ignored
    pub fn handle_name(&self, name: &str, engine: &Engine) -> Result<Option<Command>, EngineError> {
        match Key::from_name(name) {
            Some(key) => self.handle_key(key, engine).map(Some),
            None => {
                log::trace!("ignoring unmapped key {name:?}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RunState;

    fn router() -> InputRouter {
        InputRouter::new(&Settings::default())
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("LEFT"), Some(Key::Left));
        assert_eq!(Key::from_name(" right "), Some(Key::Right));
        assert_eq!(Key::from_name("F"), Some(Key::Fast));
        assert_eq!(Key::from_name("normal"), Some(Key::Normal));
        assert_eq!(Key::from_name("s"), Some(Key::Stop));
        assert_eq!(Key::from_name("q"), None);
        for key in [Key::Left, Key::Right, Key::Fast, Key::Normal, Key::Stop] {
            assert_eq!(Key::from_name(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_dispatch_table() {
        let router = router();
        assert_eq!(router.command_for(Key::Left), Command::MoveBat(-4));
        assert_eq!(router.command_for(Key::Right), Command::MoveBat(4));
        assert_eq!(router.command_for(Key::Fast), Command::SetSpeed(SpeedMode::Fast));
        assert_eq!(
            router.command_for(Key::Normal),
            Command::SetSpeed(SpeedMode::Normal)
        );
        assert_eq!(router.command_for(Key::Stop), Command::Stop);
    }

    #[test]
    fn test_keys_drive_engine() {
        let engine = Engine::new(Settings::default()).unwrap();
        let router = router();

        router.handle_key(Key::Right, &engine).unwrap();
        assert_eq!(engine.snapshot().unwrap().bat.x(), 320);
        router.handle_key(Key::Left, &engine).unwrap();
        router.handle_key(Key::Left, &engine).unwrap();
        assert_eq!(engine.snapshot().unwrap().bat.x(), 280);

        router.handle_key(Key::Fast, &engine).unwrap();
        assert_eq!(engine.speed().unwrap(), SpeedMode::Fast);
        router.handle_key(Key::Normal, &engine).unwrap();
        assert_eq!(engine.speed().unwrap(), SpeedMode::Normal);

        router.handle_key(Key::Stop, &engine).unwrap();
        assert_eq!(engine.run_state().unwrap(), RunState::Finished);
    }

    #[test]
    fn test_unmapped_name_is_ignored() {
        let engine = Engine::new(Settings::default()).unwrap();
        let before = engine.snapshot().unwrap();
        assert_eq!(router().handle_name("space", &engine).unwrap(), None);
        assert_eq!(engine.snapshot().unwrap(), before);
        assert_eq!(
            router().handle_name("right", &engine).unwrap(),
            Some(Command::MoveBat(4))
        );
    }
}
