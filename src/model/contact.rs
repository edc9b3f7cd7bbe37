use serde::{Deserialize, Serialize};

/// Fixed avatar palette. A contact's color is chosen by its creation-order
/// index modulo the palette length, so avatars stay stable across clients.
pub const AVATAR_PALETTE: [&str; 30] = [
    "#008B8B", "#8A2BE2", "#CD661D", "#696969", "#228B22", "#8B864E", "#FF8C00", "#FFA500",
    "#FF1493", "#CD0000", "#BA55D3", "#FFC125", "#B03060", "#858585", "#483D8B", "#FF4040",
    "#BC8F8F", "#FFA54F", "#3CB371", "#EE7600", "#FA8072", "#8B0000", "#BF3EFF", "#CD9B1D",
    "#104E8B", "#FF7F24", "#708090", "#00CD00", "#FF7F50", "#FF8247",
];

/// Pick the avatar color for the given creation-order index.
pub fn avatar_color(index: usize) -> &'static str {
    AVATAR_PALETTE[index % AVATAR_PALETTE.len()]
}

/// A person who can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub phone: String,
    /// Avatar background, hex color. Assigned on creation from the palette.
    #[serde(default, alias = "bgcolor", rename = "bgColor")]
    pub bg_color: String,
    /// Selection highlight. Transient UI state, never persisted; at most one
    /// contact in a directory carries it at a time.
    #[serde(skip)]
    pub active: bool,
}

impl Contact {
    pub fn new(name: impl Into<String>, mail: impl Into<String>, phone: impl Into<String>) -> Self {
        Contact {
            id: String::new(),
            name: name.into(),
            mail: mail.into(),
            phone: phone.into(),
            bg_color: String::new(),
            active: false,
        }
    }

    /// Uppercase initials from the first and last name parts.
    /// Single-word names yield one letter.
    pub fn initials(&self) -> String {
        let parts: Vec<&str> = self.name.split_whitespace().collect();
        let first = parts.first().and_then(|p| p.chars().next());
        let last = if parts.len() > 1 {
            parts.last().and_then(|p| p.chars().next())
        } else {
            None
        };
        first
            .into_iter()
            .chain(last)
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}
