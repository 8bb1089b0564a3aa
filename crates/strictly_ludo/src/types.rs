//! Core domain types for Ludo.

use super::board::{self, ENTRY_OFFSETS, HOME, LAST_RING_STEP, SEAT_COUNT, TOKENS_PER_SEAT, YARD};
use derive_getters::Getters;
use derive_more::{Display, Error};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Seat color, in fixed clockwise seat order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    /// Seat 0, enters the ring at cell 0.
    Red,
    /// Seat 1, enters the ring at cell 13.
    Green,
    /// Seat 2, enters the ring at cell 26.
    Yellow,
    /// Seat 3, enters the ring at cell 39.
    Blue,
}

impl Color {
    /// All colors in seat order.
    pub const ALL: [Color; SEAT_COUNT] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    /// Returns the seat this color always occupies.
    pub fn seat(self) -> SeatIndex {
        SeatIndex(self as u8)
    }

    /// Returns the ring cell where this color's tokens enter.
    pub fn entry_offset(self) -> u8 {
        ENTRY_OFFSETS[self as usize]
    }

    /// Capitalized label for display.
    #[instrument(level = "trace")]
    pub fn label(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
        }
    }
}

/// Who occupies a seat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatKind {
    /// A person choosing moves through the front end.
    Human,
    /// A move policy chooses on this seat's behalf.
    Computer,
    /// Nobody sits here; the seat is never dealt a turn.
    Inactive,
}

impl SeatKind {
    /// Returns true for seats that take turns.
    pub fn is_active(self) -> bool {
        !matches!(self, SeatKind::Inactive)
    }
}

/// How seats are filled when a match starts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameMode {
    /// One human at Red against three computer seats.
    #[default]
    VsComputer,
    /// Red against Yellow, both human; Green and Blue sit out.
    TwoPlayerHuman,
    /// Four humans.
    FourPlayerHuman,
}

impl GameMode {
    /// Seat kinds in seat order.
    #[instrument]
    pub fn seat_kinds(self) -> [SeatKind; SEAT_COUNT] {
        use SeatKind::*;
        match self {
            GameMode::VsComputer => [Human, Computer, Computer, Computer],
            GameMode::TwoPlayerHuman => [Human, Inactive, Human, Inactive],
            GameMode::FourPlayerHuman => [Human, Human, Human, Human],
        }
    }

    /// Default display name for a seat in this mode.
    #[instrument]
    pub fn default_name(self, seat: SeatIndex) -> String {
        default_seat_name(seat, self.seat_kinds()[seat.index()], self)
    }
}

pub(crate) fn default_seat_name(seat: SeatIndex, kind: SeatKind, mode: GameMode) -> String {
    match kind {
        SeatKind::Inactive => "-".to_string(),
        SeatKind::Computer => format!("CPU {}", seat.color().label()),
        SeatKind::Human if mode == GameMode::VsComputer && seat.index() == 0 => "You".to_string(),
        SeatKind::Human => format!("Player {}", seat.index() + 1),
    }
}

/// An index outside the range a seat or token id allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("{} index {} is out of range (must be below {})", what, value, bound)]
pub struct IndexOutOfRange {
    /// What kind of index was rejected.
    pub what: &'static str,
    /// The rejected value.
    pub value: u8,
    /// Exclusive upper bound.
    pub bound: u8,
}

/// Index of a seat (0-3), which also fixes its color.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct SeatIndex(u8);

impl SeatIndex {
    /// All seats in turn order.
    pub const ALL: [SeatIndex; SEAT_COUNT] =
        [SeatIndex(0), SeatIndex(1), SeatIndex(2), SeatIndex(3)];

    /// Creates a seat index, or `None` if out of range.
    pub fn new(index: usize) -> Option<Self> {
        (index < SEAT_COUNT).then_some(SeatIndex(index as u8))
    }

    /// Returns the index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the color of this seat.
    pub fn color(self) -> Color {
        Color::ALL[self.index()]
    }

    /// Returns the next seat clockwise, wrapping after Blue.
    pub fn next(self) -> Self {
        SeatIndex((self.0 + 1) % SEAT_COUNT as u8)
    }
}

impl TryFrom<u8> for SeatIndex {
    type Error = IndexOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SeatIndex::new(value as usize).ok_or(IndexOutOfRange {
            what: "Seat",
            value,
            bound: SEAT_COUNT as u8,
        })
    }
}

impl From<SeatIndex> for u8 {
    fn from(seat: SeatIndex) -> Self {
        seat.0
    }
}

/// Id of a token within its seat (0-3).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct TokenId(u8);

impl TokenId {
    /// All token ids of a seat.
    pub const ALL: [TokenId; TOKENS_PER_SEAT] = [TokenId(0), TokenId(1), TokenId(2), TokenId(3)];

    /// Creates a token id, or `None` if out of range.
    pub fn new(id: usize) -> Option<Self> {
        (id < TOKENS_PER_SEAT).then_some(TokenId(id as u8))
    }

    /// Returns the id as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for TokenId {
    type Error = IndexOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TokenId::new(value as usize).ok_or(IndexOutOfRange {
            what: "Token",
            value,
            bound: TOKENS_PER_SEAT as u8,
        })
    }
}

impl From<TokenId> for u8 {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

/// Where a token is along its journey.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TokenZone {
    /// Waiting to enter (`steps_moved == -1`).
    Yard,
    /// On the shared ring (`0..=50`).
    Ring,
    /// In the seat's private home stretch (`51..=56`).
    HomeStretch,
    /// Arrived (`57`).
    Home,
}

/// A single token.
///
/// Progress is one integer, `steps_moved`, always within `[-1, 57]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Owning seat.
    seat: SeatIndex,
    /// Id within the owning seat.
    id: TokenId,
    /// Progress: -1 yard, 0-50 ring, 51-56 home stretch, 57 home.
    steps_moved: i8,
}

impl Token {
    pub(crate) fn in_yard(seat: SeatIndex, id: TokenId) -> Self {
        Self {
            seat,
            id,
            steps_moved: YARD,
        }
    }

    /// Returns the owning seat.
    pub fn seat(&self) -> SeatIndex {
        self.seat
    }

    /// Returns the id within the owning seat.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Returns the token's progress.
    pub fn steps_moved(&self) -> i8 {
        self.steps_moved
    }

    /// Returns the color of the owning seat.
    pub fn color(&self) -> Color {
        self.seat.color()
    }

    /// Returns which zone the token is in.
    pub fn zone(&self) -> TokenZone {
        match self.steps_moved {
            YARD => TokenZone::Yard,
            HOME => TokenZone::Home,
            s if s <= LAST_RING_STEP => TokenZone::Ring,
            _ => TokenZone::HomeStretch,
        }
    }

    /// Returns true while waiting in the yard.
    pub fn is_in_yard(&self) -> bool {
        self.steps_moved == YARD
    }

    /// Returns true once the token has arrived home.
    pub fn is_home(&self) -> bool {
        self.steps_moved == HOME
    }

    /// Global ring cell, defined only while on the ring.
    pub fn global_cell(&self) -> Option<u8> {
        board::global_cell(self.color(), self.steps_moved)
    }

    /// Returns true if the token cannot be captured where it stands.
    pub fn is_safe(&self) -> bool {
        board::is_safe_position(self.color(), self.steps_moved)
    }

    /// Moves a yard token onto its own entry cell.
    pub(crate) fn enter_ring(&mut self) {
        debug_assert!(self.is_in_yard());
        self.steps_moved = 0;
    }

    /// Moves a token already out of the yard forward.
    pub(crate) fn advance(&mut self, steps: u8) {
        debug_assert!(!self.is_in_yard());
        debug_assert!(self.steps_moved as i16 + steps as i16 <= HOME as i16);
        self.steps_moved += steps as i8;
    }

    /// Captured: back to the yard.
    pub(crate) fn send_to_yard(&mut self) {
        self.steps_moved = YARD;
    }

    pub(crate) fn place(&mut self, steps_moved: i8) {
        self.steps_moved = steps_moved;
    }
}

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Seat {
    /// Position in turn order.
    index: SeatIndex,
    /// Who plays this seat.
    kind: SeatKind,
    /// Display name.
    name: String,
}

impl Seat {
    pub(crate) fn new(index: SeatIndex, kind: SeatKind, name: String) -> Self {
        Self { index, kind, name }
    }

    /// Returns the seat color.
    pub fn color(&self) -> Color {
        self.index.color()
    }

    /// Returns true if this seat takes turns.
    pub fn is_active(&self) -> bool {
        self.kind.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_schemas_are_plain_integers() {
        for schema in [schemars::schema_for!(SeatIndex), schemars::schema_for!(TokenId)] {
            let schema = serde_json::to_value(schema).unwrap();
            assert_eq!(schema["type"], "integer");
        }
    }

    #[test]
    fn test_color_seat_order() {
        for (i, color) in Color::ALL.into_iter().enumerate() {
            assert_eq!(color.seat().index(), i);
            assert_eq!(SeatIndex::new(i).map(SeatIndex::color), Some(color));
        }
    }

    #[test]
    fn test_seat_next_wraps() {
        let blue = Color::Blue.seat();
        assert_eq!(blue.next(), Color::Red.seat());
    }

    #[test]
    fn test_index_bounds() {
        assert!(SeatIndex::new(4).is_none());
        assert!(TokenId::new(4).is_none());
        let err = SeatIndex::try_from(9).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_mode_seat_kinds() {
        assert_eq!(
            GameMode::TwoPlayerHuman.seat_kinds(),
            [SeatKind::Human, SeatKind::Inactive, SeatKind::Human, SeatKind::Inactive]
        );
        assert_eq!(GameMode::VsComputer.default_name(SeatIndex(0)), "You");
        assert_eq!(GameMode::VsComputer.default_name(SeatIndex(2)), "CPU Yellow");
        assert_eq!(GameMode::FourPlayerHuman.default_name(SeatIndex(3)), "Player 4");
        assert_eq!(GameMode::TwoPlayerHuman.default_name(SeatIndex(1)), "-");
    }

    #[test]
    fn test_mode_parses_from_kebab_case() {
        let mode: GameMode = "two-player-human".parse().unwrap();
        assert_eq!(mode, GameMode::TwoPlayerHuman);
        assert_eq!(GameMode::VsComputer.to_string(), "vs-computer");
    }

    #[test]
    fn test_token_zones() {
        let mut token = Token::in_yard(SeatIndex(0), TokenId(0));
        assert_eq!(token.zone(), TokenZone::Yard);
        assert!(token.is_safe());
        token.enter_ring();
        assert_eq!(token.zone(), TokenZone::Ring);
        token.advance(50);
        assert_eq!(token.zone(), TokenZone::Ring);
        token.advance(1);
        assert_eq!(token.zone(), TokenZone::HomeStretch);
        assert!(token.global_cell().is_none());
        token.advance(6);
        assert_eq!(token.zone(), TokenZone::Home);
    }
}
