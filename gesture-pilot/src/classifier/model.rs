//! Gesture and command vocabulary
//!
//! `Gesture` is what the classifier can emit. `Command` is what the vehicle
//! accepts: every gesture plus `reset`, which only arrives through the
//! manual/API path.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::PilotError;

/// Gesture labels (order is the stats table order)
pub const GESTURE_NAMES: [&str; 8] = [
    "go_forward", "back", "left", "right", "up", "down", "stop", "land",
];

/// Closed gesture vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gesture {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    Stop,
    Land,
}

impl Gesture {
    pub const ALL: [Gesture; 8] = [
        Gesture::Forward,
        Gesture::Back,
        Gesture::Left,
        Gesture::Right,
        Gesture::Up,
        Gesture::Down,
        Gesture::Stop,
        Gesture::Land,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in `ALL`, used to index per-gesture tables
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        GESTURE_NAMES[self.index()]
    }

    /// How to make the gesture
    pub fn description(&self) -> &'static str {
        match self {
            Gesture::Forward => "Open hand, fingers held together, palm toward the camera",
            Gesture::Back => "Closed fist",
            Gesture::Left => "Thumb out pointing left, other fingers curled",
            Gesture::Right => "Thumb out pointing right, other fingers curled",
            Gesture::Up => "Index finger pointing up, other fingers curled",
            Gesture::Down => "Hand pointing down",
            Gesture::Stop => "Open palm with fingers spread wide",
            Gesture::Land => "Thumb and index tips pinched, other fingers extended",
        }
    }

    /// Movement gestures become continuous commands on the vehicle
    pub fn is_movement(&self) -> bool {
        !matches!(self, Gesture::Stop | Gesture::Land)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gesture {
    type Err = PilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| PilotError::UnknownCommand(s.to_string()))
    }
}

impl Serialize for Gesture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Input vocabulary of the vehicle controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Gesture(Gesture),
    Reset,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Gesture(g) => g.as_str(),
            Command::Reset => "reset",
        }
    }
}

impl From<Gesture> for Command {
    fn from(gesture: Gesture) -> Self {
        Command::Gesture(gesture)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = PilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "reset" {
            return Ok(Command::Reset);
        }
        s.parse::<Gesture>().map(Command::Gesture)
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Name and how-to for one gesture
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GestureInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every gesture with its description, in stats table order
pub fn gesture_catalog() -> Vec<GestureInfo> {
    Gesture::ALL
        .iter()
        .map(|g| GestureInfo {
            name: g.as_str(),
            description: g.description(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for gesture in Gesture::ALL {
            assert_eq!(gesture.as_str().parse::<Gesture>().unwrap(), gesture);
        }
        assert_eq!("reset".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!(
            "go_forward".parse::<Command>().unwrap(),
            Command::Gesture(Gesture::Forward)
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = "barrel_roll".parse::<Command>().unwrap_err();
        assert!(matches!(err, PilotError::UnknownCommand(name) if name == "barrel_roll"));
        assert!("reset".parse::<Gesture>().is_err());
    }

    #[test]
    fn test_movement_classification() {
        assert!(Gesture::Forward.is_movement());
        assert!(Gesture::Down.is_movement());
        assert!(!Gesture::Stop.is_movement());
        assert!(!Gesture::Land.is_movement());
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&Gesture::Forward).unwrap();
        assert_eq!(json, "\"go_forward\"");
        let json = serde_json::to_string(&Command::Reset).unwrap();
        assert_eq!(json, "\"reset\"");
    }

    #[test]
    fn test_catalog_covers_vocabulary() {
        let catalog = gesture_catalog();
        let names: Vec<&str> = catalog.iter().map(|g| g.name).collect();
        assert_eq!(names, GESTURE_NAMES);
        assert!(catalog.iter().all(|g| !g.description.is_empty()));
    }
}
