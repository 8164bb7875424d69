// Emergency helpline directory.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Helpline {
    pub name: &'static str,
    pub number: &'static str,
}

/// Numbers shown by `guardia helplines`.
pub const HELPLINES: &[Helpline] = &[
    Helpline {
        name: "Police",
        number: "112",
    },
    Helpline {
        name: "Women Helpline",
        number: "181",
    },
    Helpline {
        name: "Ambulance",
        number: "108",
    },
    Helpline {
        name: "National Emergency",
        number: "112",
    },
];
