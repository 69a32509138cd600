use crate::model::work_item::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Upper-case hex as DrawingML `srgbClr` expects it.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub fn state_color(state: State) -> Rgb {
    match state {
        State::Active => Rgb(0, 112, 192),
        State::New => Rgb(255, 165, 0),
        State::Resolved | State::Closed => Rgb(0, 176, 80),
        State::Unknown => Rgb::BLACK,
    }
}
