//! HUD text
//!
//! Pure formatting over a [`Snapshot`]; the page just drops these strings
//! into its elements.

use serde::Serialize;

use crate::best::to_meters;
use crate::sim::{ModeConfig, ObjectiveKind, RunStatus, Snapshot};

/// Text for every HUD element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub speed: String,
    pub distance: String,
    pub best: String,
    pub kills: String,
    pub powerups: String,
    pub objective: String,
    /// Overlay title and message once the run has ended
    pub title: Option<&'static str>,
    pub message: Option<String>,
}

impl Hud {
    pub fn from_snapshot(snapshot: &Snapshot<'_>) -> Self {
        Self {
            speed: format!("{:.1} km/h", snapshot.bike.speed_kmh()),
            distance: format!("{} m", to_meters(snapshot.distance)),
            best: format!("{} m", to_meters(snapshot.best_distance)),
            kills: snapshot.kills.to_string(),
            powerups: powerup_summary(snapshot.shield_charges, snapshot.timers.rapid_fire),
            objective: objective_summary(&objective_config(snapshot)),
            title: overlay_title(snapshot.status),
            message: end_message(snapshot),
        }
    }
}

/// "Shield xN | Rapid T.Ts", or "None"
pub fn powerup_summary(shield_charges: u8, rapid_fire: f32) -> String {
    let mut parts = Vec::new();
    if shield_charges > 0 {
        parts.push(format!("Shield x{}", shield_charges));
    }
    if rapid_fire > 0.0 {
        parts.push(format!("Rapid {:.1}s", rapid_fire));
    }
    if parts.is_empty() {
        "None".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Mode description followed by its objective
pub fn objective_summary(config: &ModeConfig) -> String {
    let objective = match config.objective {
        Some(o) if o.kind == ObjectiveKind::Distance => {
            format!("Objective: Reach {} m", to_meters(o.target))
        }
        Some(o) => format!("Objective: Get {} kills", o.target as u32),
        None => "Objective: Chill and explore".to_string(),
    };
    format!("{} - {}", config.description, objective)
}

/// Before a run the pending mode is shown; afterwards the run's own record
fn objective_config(snapshot: &Snapshot<'_>) -> ModeConfig {
    if snapshot.status == RunStatus::Running || snapshot.status.is_terminal() {
        *snapshot.config
    } else {
        snapshot.mode.config()
    }
}

fn overlay_title(status: RunStatus) -> Option<&'static str> {
    match status {
        RunStatus::Crashed => Some("You Died"),
        RunStatus::Win => Some("Objective Complete"),
        _ => None,
    }
}

fn end_message(snapshot: &Snapshot<'_>) -> Option<String> {
    match snapshot.status {
        RunStatus::Crashed => Some("The track claimed you.".to_string()),
        RunStatus::Win => {
            let by_distance = snapshot
                .config
                .objective
                .is_some_and(|o| o.kind == ObjectiveKind::Distance);
            Some(if by_distance {
                format!("You reached {} m.", to_meters(snapshot.distance))
            } else {
                format!("You got {} kills.", snapshot.kills)
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameMode, GameState, Viewport};

    #[test]
    fn test_powerup_summary() {
        assert_eq!(powerup_summary(0, 0.0), "None");
        assert_eq!(powerup_summary(2, 0.0), "Shield x2");
        assert_eq!(powerup_summary(1, 3.3), "Shield x1 | Rapid 3.3s");
        assert_eq!(powerup_summary(0, 8.0), "Rapid 8.0s");
    }

    #[test]
    fn test_objective_summary() {
        assert_eq!(
            objective_summary(&GameMode::Standard.config()),
            "Ride far and shoot foes. - Objective: Reach 360 m"
        );
        assert_eq!(
            objective_summary(&GameMode::Nightmare.config()),
            "Tougher enemies; rack up kills. - Objective: Get 12 kills"
        );
        assert!(objective_summary(&GameMode::Chill.config()).ends_with("Chill and explore"));
    }

    #[test]
    fn test_hud_from_running_state() {
        let mut state = GameState::new(3, Viewport::default());
        state.start_run();
        state.distance = 1804.0;
        state.best_distance = 2500.0;
        state.kills = 4;
        state.bike.vel.x = -250.0;

        let hud = Hud::from_snapshot(&state.snapshot());
        assert_eq!(hud.speed, "9.0 km/h");
        assert_eq!(hud.distance, "360 m");
        assert_eq!(hud.best, "500 m");
        assert_eq!(hud.kills, "4");
        assert_eq!(hud.powerups, "None");
        assert!(hud.title.is_none());
        assert!(hud.message.is_none());
    }

    #[test]
    fn test_end_messages() {
        let mut state = GameState::new(3, Viewport::default());
        state.start_run();
        state.crash();
        let hud = Hud::from_snapshot(&state.snapshot());
        assert_eq!(hud.title, Some("You Died"));
        assert_eq!(hud.message.as_deref(), Some("The track claimed you."));

        state.select_mode("standard");
        state.start_run();
        state.distance = 1800.0;
        state.win(ObjectiveKind::Distance);
        let hud = Hud::from_snapshot(&state.snapshot());
        assert_eq!(hud.message.as_deref(), Some("You reached 360 m."));

        state.select_mode("nightmare");
        state.start_run();
        state.kills = 12;
        state.win(ObjectiveKind::Kills);
        let hud = Hud::from_snapshot(&state.snapshot());
        assert_eq!(hud.title, Some("Objective Complete"));
        assert_eq!(hud.message.as_deref(), Some("You got 12 kills."));
    }

    #[test]
    fn test_end_screen_survives_mode_change() {
        let mut state = GameState::new(3, Viewport::default());
        state.select_mode("standard");
        state.start_run();
        state.distance = 1800.0;
        state.win(ObjectiveKind::Distance);
        let before = Hud::from_snapshot(&state.snapshot());

        assert_eq!(state.select_mode("nightmare"), GameMode::Nightmare);
        let after = Hud::from_snapshot(&state.snapshot());
        assert_eq!(after.message.as_deref(), Some("You reached 360 m."));
        assert_eq!(after.objective, before.objective);

        // The next run picks up the new mode
        state.start_run();
        let next = Hud::from_snapshot(&state.snapshot());
        assert!(next.objective.ends_with("Get 12 kills"));
    }

    #[test]
    fn test_title_shows_pending_mode() {
        let mut state = GameState::new(3, Viewport::default());
        state.select_mode("chill");
        let hud = Hud::from_snapshot(&state.snapshot());
        assert!(hud.objective.ends_with("Chill and explore"));
    }
}
