use colored::Color;
use once_cell::sync::Lazy;

/// A 24-bit color, convertible for both terminal text and clap help.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn term(self) -> Color {
        Color::TrueColor {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }

    pub fn table(self) -> comfy_table::Color {
        comfy_table::Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }

    pub fn clap(self) -> clap::builder::styling::Color {
        clap::builder::styling::Color::Rgb(clap::builder::styling::RgbColor(self.0, self.1, self.2))
    }
}

/// Colors keyed by what the CLI is showing.
pub struct Palette {
    pub ok: Rgb,
    pub failure: Rgb,
    pub caution: Rgb,
    pub note: Rgb,
    pub heading: Rgb,
    /// Unit paths and unit-level methods (constructor, getInstance, clear).
    pub unit: Rgb,
    /// Per-field get/put/has/remove methods.
    pub accessor: Rgb,
    pub key: Rgb,
    pub value: Rgb,
    pub command: Rgb,
    pub dim: Rgb,
}

impl Palette {
    fn dark() -> Self {
        Self {
            ok: Rgb(126, 211, 133),
            failure: Rgb(240, 98, 98),
            caution: Rgb(236, 190, 92),
            note: Rgb(122, 178, 235),
            heading: Rgb(196, 160, 245),
            unit: Rgb(104, 206, 201),
            accessor: Rgb(240, 170, 120),
            key: Rgb(168, 214, 110),
            value: Rgb(222, 222, 222),
            command: Rgb(150, 190, 255),
            dim: Rgb(130, 130, 140),
        }
    }

    fn light() -> Self {
        Self {
            ok: Rgb(30, 130, 60),
            failure: Rgb(180, 30, 40),
            caution: Rgb(160, 100, 0),
            note: Rgb(30, 90, 170),
            heading: Rgb(100, 50, 160),
            unit: Rgb(0, 120, 120),
            accessor: Rgb(170, 80, 20),
            key: Rgb(70, 120, 20),
            value: Rgb(40, 40, 40),
            command: Rgb(30, 70, 160),
            dim: Rgb(110, 110, 120),
        }
    }

    /// `PREFROOM_THEME=light` switches to the palette for light backgrounds.
    fn from_env() -> Self {
        match std::env::var("PREFROOM_THEME").as_deref() {
            Ok("light") => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Color for an inspect method role.
    pub fn role(&self, role: &str) -> Rgb {
        match role {
            "get" | "put" | "has" | "remove" => self.accessor,
            "other" => self.dim,
            _ => self.unit,
        }
    }
}

pub static PALETTE: Lazy<Palette> = Lazy::new(Palette::from_env);

pub struct Glyphs {
    pub ok: &'static str,
    pub failure: &'static str,
    pub caution: &'static str,
    pub note: &'static str,
    pub step: &'static str,
    pub item: &'static str,
    pub key: &'static str,
    pub call: &'static str,
}

pub const GLYPHS: Glyphs = Glyphs {
    ok: "●",
    failure: "✘",
    caution: "▲",
    note: "›",
    step: "$",
    item: "◦",
    key: "⚿",
    call: "⇢",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_split_between_unit_and_accessor_colors() {
        let palette = Palette::dark();
        assert_eq!(palette.role("get"), palette.accessor);
        assert_eq!(palette.role("remove"), palette.accessor);
        assert_eq!(palette.role("singleton"), palette.unit);
        assert_eq!(palette.role("clear"), palette.unit);
        assert_eq!(palette.role("other"), palette.dim);
    }
}
