use crate::{
    cloud::layout::PlacedWord,
    foundation::{
        core::{Rgba8, Rng64},
        error::{CloudError, CloudResult},
    },
};

/// Tier color for a rendered font size. Larger fonts come from heavier (shallower) types.
pub fn color_for_font_size(font_size: u32) -> &'static str {
    if font_size > 80 {
        "hsl(220, 80%, 40%)" // deep blue
    } else if font_size > 60 {
        "hsl(260, 70%, 50%)" // purple
    } else if font_size > 40 {
        "hsl(300, 60%, 60%)" // magenta
    } else if font_size > 20 {
        "hsl(340, 50%, 70%)" // pink
    } else {
        "hsl(20, 40%, 80%)" // light orange
    }
}

/// Color function that applies [`color_for_font_size`] to a placed word.
pub fn tier_color(word: &PlacedWord, _rng: &mut Rng64) -> String {
    color_for_font_size(word.font_size).to_string()
}

const VIRIDIS_STOPS: [(f64, [f64; 3]); 5] = [
    (0.00, [68.0, 1.0, 84.0]),
    (0.25, [59.0, 82.0, 139.0]),
    (0.50, [33.0, 145.0, 140.0]),
    (0.75, [94.0, 201.0, 98.0]),
    (1.00, [253.0, 231.0, 37.0]),
];

/// Sample the viridis colormap at `t` in `[0, 1]`.
pub fn viridis(t: f64) -> Rgba8 {
    let t = t.clamp(0.0, 1.0);
    let mut lo = VIRIDIS_STOPS[0];
    let mut hi = VIRIDIS_STOPS[VIRIDIS_STOPS.len() - 1];
    for pair in VIRIDIS_STOPS.windows(2) {
        if t >= pair[0].0 && t <= pair[1].0 {
            lo = pair[0];
            hi = pair[1];
            break;
        }
    }

    let span = (hi.0 - lo.0).max(f64::EPSILON);
    let k = (t - lo.0) / span;
    let ch = |i: usize| (lo.1[i] + (hi.1[i] - lo.1[i]) * k).round().clamp(0.0, 255.0) as u8;
    Rgba8::opaque(ch(0), ch(1), ch(2))
}

/// Default color function: a random viridis sample per word.
pub fn viridis_color(_word: &PlacedWord, rng: &mut Rng64) -> String {
    let c = viridis(rng.next_f64_01());
    format!("rgb({}, {}, {})", c.r, c.g, c.b)
}

/// Parse the CSS color forms produced by color functions: `#rrggbb`, `#rrggbbaa`,
/// `rgb(r, g, b)`, `hsl(h, s%, l%)`, `white` and `black`.
pub fn parse_color(s: &str) -> CloudResult<Rgba8> {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();

    match lower.as_str() {
        "white" => return Ok(Rgba8::WHITE),
        "black" => return Ok(Rgba8::BLACK),
        _ => {}
    }

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = function_args(&lower, "rgb") {
        let [r, g, b] = parse_components(args, s)?;
        let to_u8 = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        return Ok(Rgba8::opaque(to_u8(r), to_u8(g), to_u8(b)));
    }
    if let Some(args) = function_args(&lower, "hsl") {
        let [h, sat, light] = parse_components(args, s)?;
        return Ok(hsl_to_rgba(h, sat / 100.0, light / 100.0));
    }

    Err(CloudError::validation(format!("unsupported color \"{s}\"")))
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_components(args: &str, original: &str) -> CloudResult<[f64; 3]> {
    let parts = args
        .split(',')
        .map(|p| p.trim().trim_end_matches('%').trim())
        .map(|p| {
            p.parse::<f64>()
                .map_err(|_| CloudError::validation(format!("invalid component in \"{original}\"")))
        })
        .collect::<CloudResult<Vec<_>>>()?;

    <[f64; 3]>::try_from(parts)
        .map_err(|_| CloudError::validation(format!("expected 3 components in \"{original}\"")))
}

fn parse_hex(s: &str) -> CloudResult<Rgba8> {
    fn hex_byte(pair: &str) -> CloudResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| CloudError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    if !s.is_ascii() {
        return Err(CloudError::validation("hex color must be ASCII"));
    }
    match s.len() {
        6 => Ok(Rgba8::opaque(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8 {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: hex_byte(&s[6..8])?,
        }),
        _ => Err(CloudError::validation(
            "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
        )),
    }
}

/// Standard HSL -> RGB conversion. `h` in degrees, `s` and `l` in `0..=1`.
pub fn hsl_to_rgba(h: f64, s: f64, l: f64) -> Rgba8 {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    if s == 0.0 {
        return Rgba8::opaque(to_u8(l), to_u8(l), to_u8(l));
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Rgba8::opaque(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/color.rs"]
mod tests;
