use std::fmt;

/// Roles allowed to sign in. Anything else stored in `rol` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowedRole {
    Director,
    CoordProyectos,
    Financiera,
}

impl AllowedRole {
    pub const ALL: [AllowedRole; 3] = [
        AllowedRole::Director,
        AllowedRole::CoordProyectos,
        AllowedRole::Financiera,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "Director",
            Self::CoordProyectos => "CoordProyectos",
            Self::Financiera => "Financiera",
        }
    }

    /// Match a stored role label. Surrounding whitespace is ignored; case is not.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL.into_iter().find(|role| role.as_str() == trimmed)
    }
}

impl fmt::Display for AllowedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
