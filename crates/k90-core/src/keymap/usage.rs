//! Static key name table for the K90 profile format.
//!
//! Every key a profile document may reference is listed here with its USB HID
//! usage ID. Names are matched case-sensitively and exactly; there are no
//! implicit aliases beyond the ones spelled out below.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//! The `G1`..`G18` macro keys are not on the keyboard page: the K90 reports them
//! with vendor usages `0xD0`..`0xDF` and `0xE8`..`0xE9`, which sit in ranges the
//! keyboard page leaves unused by this table.

/// `(name, usage)` pairs in table order.
///
/// When two names share a usage, the first one listed is the canonical name
/// returned by reverse lookups.
pub const KEY_USAGES: &[(&str, u8)] = &[
    // Letters (HID 0x04–0x1D)
    ("A", 0x04),
    ("B", 0x05),
    ("C", 0x06),
    ("D", 0x07),
    ("E", 0x08),
    ("F", 0x09),
    ("G", 0x0A),
    ("H", 0x0B),
    ("I", 0x0C),
    ("J", 0x0D),
    ("K", 0x0E),
    ("L", 0x0F),
    ("M", 0x10),
    ("N", 0x11),
    ("O", 0x12),
    ("P", 0x13),
    ("Q", 0x14),
    ("R", 0x15),
    ("S", 0x16),
    ("T", 0x17),
    ("U", 0x18),
    ("V", 0x19),
    ("W", 0x1A),
    ("X", 0x1B),
    ("Y", 0x1C),
    ("Z", 0x1D),

    // Digits (HID 0x1E–0x27)
    ("1", 0x1E),
    ("2", 0x1F),
    ("3", 0x20),
    ("4", 0x21),
    ("5", 0x22),
    ("6", 0x23),
    ("7", 0x24),
    ("8", 0x25),
    ("9", 0x26),
    ("0", 0x27),

    // Control and punctuation (HID 0x28–0x39)
    ("Enter", 0x28),
    ("Escape", 0x29),
    ("Backspace", 0x2A),
    ("Tab", 0x2B),
    ("Space", 0x2C),
    ("Minus", 0x2D),
    ("Equal", 0x2E),
    ("LeftBrace", 0x2F),
    ("RightBrace", 0x30),
    ("Backslash", 0x31),
    ("NonUSHash", 0x32),
    ("Semicolon", 0x33),
    ("Apostrophe", 0x34),
    ("Grave", 0x35),
    ("Comma", 0x36),
    ("Dot", 0x37),
    ("Slash", 0x38),
    ("CapsLock", 0x39),

    // Function keys F1–F12 (HID 0x3A–0x45)
    ("F1", 0x3A),
    ("F2", 0x3B),
    ("F3", 0x3C),
    ("F4", 0x3D),
    ("F5", 0x3E),
    ("F6", 0x3F),
    ("F7", 0x40),
    ("F8", 0x41),
    ("F9", 0x42),
    ("F10", 0x43),
    ("F11", 0x44),
    ("F12", 0x45),

    // Navigation cluster (HID 0x46–0x52)
    ("PrintScreen", 0x46),
    ("SysRq", 0x46),
    ("ScrollLock", 0x47),
    ("Pause", 0x48),
    ("Insert", 0x49),
    ("Home", 0x4A),
    ("PageUp", 0x4B),
    ("Delete", 0x4C),
    ("End", 0x4D),
    ("PageDown", 0x4E),
    ("Right", 0x4F),
    ("Left", 0x50),
    ("Down", 0x51),
    ("Up", 0x52),

    // Keypad (HID 0x53–0x63)
    ("NumLock", 0x53),
    ("KPSlash", 0x54),
    ("KPAsterisk", 0x55),
    ("KPMinus", 0x56),
    ("KPPlus", 0x57),
    ("KPEnter", 0x58),
    ("KP1", 0x59),
    ("KP2", 0x5A),
    ("KP3", 0x5B),
    ("KP4", 0x5C),
    ("KP5", 0x5D),
    ("KP6", 0x5E),
    ("KP7", 0x5F),
    ("KP8", 0x60),
    ("KP9", 0x61),
    ("KP0", 0x62),
    ("KPDot", 0x63),

    // Extra keys (HID 0x64–0x67)
    ("NonUSBackslash", 0x64),
    ("Menu", 0x65),
    ("Power", 0x66),
    ("KPEqual", 0x67),

    // Function keys F13–F24 (HID 0x68–0x73)
    ("F13", 0x68),
    ("F14", 0x69),
    ("F15", 0x6A),
    ("F16", 0x6B),
    ("F17", 0x6C),
    ("F18", 0x6D),
    ("F19", 0x6E),
    ("F20", 0x6F),
    ("F21", 0x70),
    ("F22", 0x71),
    ("F23", 0x72),
    ("F24", 0x73),

    // Editing and media (HID 0x74–0x81)
    ("Execute", 0x74),
    ("Help", 0x75),
    ("Props", 0x76),
    ("Select", 0x77),
    ("Stop", 0x78),
    ("Again", 0x79),
    ("Undo", 0x7A),
    ("Cut", 0x7B),
    ("Copy", 0x7C),
    ("Paste", 0x7D),
    ("Find", 0x7E),
    ("Mute", 0x7F),
    ("VolumeUp", 0x80),
    ("VolumeDown", 0x81),

    // International and language keys (HID 0x85–0x94)
    ("KPComma", 0x85),
    ("RO", 0x87),
    ("KatakanaHiragana", 0x88),
    ("Yen", 0x89),
    ("Henkan", 0x8A),
    ("Muhenkan", 0x8B),
    ("KPJPComma", 0x8C),
    ("Hangeul", 0x90),
    ("Hanja", 0x91),
    ("Katakana", 0x92),
    ("Hiragana", 0x93),
    ("ZenkakuHankaku", 0x94),

    // Keypad parentheses (HID 0xB6–0xB7)
    ("KPLeftParen", 0xB6),
    ("KPRightParen", 0xB7),

    // K90 macro keys, vendor usages
    ("G1", 0xD0),
    ("G2", 0xD1),
    ("G3", 0xD2),
    ("G4", 0xD3),
    ("G5", 0xD4),
    ("G6", 0xD5),
    ("G7", 0xD6),
    ("G8", 0xD7),
    ("G9", 0xD8),
    ("G10", 0xD9),
    ("G11", 0xDA),
    ("G12", 0xDB),
    ("G13", 0xDC),
    ("G14", 0xDD),
    ("G15", 0xDE),
    ("G16", 0xDF),
    ("G17", 0xE8),
    ("G18", 0xE9),

    // Modifiers (HID 0xE0–0xE7)
    ("LeftCtrl", 0xE0),
    ("LeftShift", 0xE1),
    ("LeftAlt", 0xE2),
    ("LeftMeta", 0xE3),
    ("RightCtrl", 0xE4),
    ("RightShift", 0xE5),
    ("RightAlt", 0xE6),
    ("RightMeta", 0xE7),
];
