//! Display cells and custom glyphs
//!
//! HD44780 controllers have eight user-definable characters (CGRAM codes
//! 0-7). GearPulse loads two arrows and six bar-fill levels into them.

/// A user-defined glyph stored in one CGRAM slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    UpArrow,
    DownArrow,
    /// Bar cell with no columns lit
    BarEmpty,
    Bar1,
    Bar2,
    Bar3,
    Bar4,
    /// Bar cell with all five columns lit
    BarFull,
}

static UP_ARROW: [u8; 8] = [
    0b00100, 0b01110, 0b10101, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000,
];
static DOWN_ARROW: [u8; 8] = [
    0b00100, 0b00100, 0b00100, 0b00100, 0b10101, 0b01110, 0b00100, 0b00000,
];
static BAR_FILL: [[u8; 8]; 6] = [
    [0b00000; 8],
    [0b10000; 8],
    [0b11000; 8],
    [0b11100; 8],
    [0b11110; 8],
    [0b11111; 8],
];

impl Glyph {
    /// Every glyph, in CGRAM slot order
    pub const ALL: [Glyph; 8] = [
        Glyph::UpArrow,
        Glyph::DownArrow,
        Glyph::BarEmpty,
        Glyph::Bar1,
        Glyph::Bar2,
        Glyph::Bar3,
        Glyph::Bar4,
        Glyph::BarFull,
    ];

    /// Bar glyph lit `fifths` columns out of five (clamped to 5)
    pub const fn bar(fifths: u8) -> Self {
        match fifths {
            0 => Glyph::BarEmpty,
            1 => Glyph::Bar1,
            2 => Glyph::Bar2,
            3 => Glyph::Bar3,
            4 => Glyph::Bar4,
            _ => Glyph::BarFull,
        }
    }

    /// CGRAM slot holding this glyph
    pub const fn slot(self) -> u8 {
        match self {
            Glyph::UpArrow => 0,
            Glyph::DownArrow => 1,
            Glyph::BarEmpty => 2,
            Glyph::Bar1 => 3,
            Glyph::Bar2 => 4,
            Glyph::Bar3 => 5,
            Glyph::Bar4 => 6,
            Glyph::BarFull => 7,
        }
    }

    /// 5x8 pixel pattern, one byte per pixel row (low five bits used)
    pub fn bitmap(self) -> &'static [u8; 8] {
        match self {
            Glyph::UpArrow => &UP_ARROW,
            Glyph::DownArrow => &DOWN_ARROW,
            Glyph::BarEmpty => &BAR_FILL[0],
            Glyph::Bar1 => &BAR_FILL[1],
            Glyph::Bar2 => &BAR_FILL[2],
            Glyph::Bar3 => &BAR_FILL[3],
            Glyph::Bar4 => &BAR_FILL[4],
            Glyph::BarFull => &BAR_FILL[5],
        }
    }

    /// Closest Unicode rendering, for logs and tests
    pub const fn as_char(self) -> char {
        match self {
            Glyph::UpArrow => '↑',
            Glyph::DownArrow => '↓',
            Glyph::BarEmpty => '·',
            Glyph::Bar1 => '▏',
            Glyph::Bar2 => '▎',
            Glyph::Bar3 => '▍',
            Glyph::Bar4 => '▌',
            Glyph::BarFull => '█',
        }
    }
}

/// One character position on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cell {
    /// Printable character; drivers map it to the controller's ROM
    Char(char),
    /// Custom glyph from CGRAM
    Glyph(Glyph),
}

impl Cell {
    /// Blank cell
    pub const SPACE: Cell = Cell::Char(' ');

    /// Closest Unicode rendering of the cell
    pub const fn as_char(self) -> char {
        match self {
            Cell::Char(c) => c,
            Cell::Glyph(g) => g.as_char(),
        }
    }
}

impl From<char> for Cell {
    fn from(c: char) -> Self {
        Cell::Char(c)
    }
}

impl From<Glyph> for Cell {
    fn from(g: Glyph) -> Self {
        Cell::Glyph(g)
    }
}
