//! Fixed timestep simulation tick
//!
//! One call advances the ball a single step and resolves every collision
//! rule in a fixed order. Each rule flips direction on its own, so a corner
//! hit can flip the same axis more than once in one tick.

use super::collision::wall_contact;
use super::state::GameState;
use crate::error::EngineError;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball bounced off the left or right wall
    SideWall,
    /// Ball bounced off the top, below the menu bar
    TopWall,
    /// Ball reached the bottom and the miss penalty was applied
    Bottom,
    /// Brick at this index in the wall was destroyed
    BrickDestroyed(usize),
    /// Ball bounced off the bat
    Bat,
}

/// Advance the game state by one tick
///
/// A finished game is left untouched. Returns the events of this tick in the
/// order they were resolved.
pub fn tick(state: &mut GameState) -> Result<Vec<GameEvent>, EngineError> {
    let mut events = Vec::new();
    if state.is_finished() {
        return Ok(events);
    }

    state.time_ticks += 1;

    // Move the ball one step along its direction
    let ball_move = state.settings.ball_move;
    state.ball.step(ball_move);

    // Edge of the playfield
    let contact = wall_contact(state.ball.pos, &state.settings);
    if contact.right {
        state.ball.flip_x();
        events.push(GameEvent::SideWall);
    }
    if contact.left {
        state.ball.flip_x();
        events.push(GameEvent::SideWall);
    }
    if contact.bottom {
        state.ball.flip_y();
        state.add_to_score(state.settings.hit_bottom)?;
        events.push(GameEvent::Bottom);
    }
    if contact.top {
        state.ball.flip_y();
        events.push(GameEvent::TopWall);
    }

    // Bricks: every overlapped brick scores, but the ball turns once
    let mut hit = false;
    for index in 0..state.bricks.len() {
        let brick = &mut state.bricks[index];
        if brick.visible && brick.hit_by(&state.ball) {
            brick.visible = false;
            hit = true;
            state.add_to_score(state.settings.hit_brick)?;
            events.push(GameEvent::BrickDestroyed(index));
        }
    }
    if hit {
        state.ball.flip_y();
    }

    if state.ball.hit_by(&state.bat) {
        state.ball.flip_y();
        events.push(GameEvent::Bat);
    }

    if !events.is_empty() {
        log::debug!("tick {}: {:?} (score {})", state.time_ticks, events, state.score);
    }

    Ok(events)
}
