pub const SCREEN_WIDTH: &str = "screenWidth";
pub const SCREEN_HEIGHT: &str = "screenHeight";
pub const TIME: &str = "time";

/// Locations of the three uniforms every preview shader may declare.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniforms<L> {
    pub screen_width: L,
    pub screen_height: L,
    pub time: L,
}

impl<L> Uniforms<L> {
    pub fn resolve(mut lookup: impl FnMut(&str) -> L) -> Self {
        Self {
            screen_width: lookup(SCREEN_WIDTH),
            screen_height: lookup(SCREEN_HEIGHT),
            time: lookup(TIME),
        }
    }
}
