//! In-memory figure model: figures hold stacked axes, axes hold series

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Default colour cycle for series without an explicit colour
pub const COLOR_CYCLE: [Rgb; 10] = [
    Rgb(31, 119, 180),
    Rgb(255, 127, 14),
    Rgb(44, 160, 44),
    Rgb(214, 39, 40),
    Rgb(148, 103, 189),
    Rgb(140, 86, 75),
    Rgb(227, 119, 194),
    Rgb(127, 127, 127),
    Rgb(188, 189, 34),
    Rgb(23, 190, 207),
];

pub const GRAY: Rgb = Rgb(128, 128, 128);
pub const RED: Rgb = Rgb(255, 0, 0);

/// Resolve a colour name, single-letter code, `C0`..`C9` cycle entry or `#rrggbb` hex string
pub fn parse_color(name: &str) -> Option<Rgb> {
    let name = name.trim().to_ascii_lowercase();
    let color = match name.as_str() {
        "red" | "r" => RED,
        "green" | "g" => Rgb(0, 128, 0),
        "blue" | "b" => Rgb(0, 0, 255),
        "black" | "k" => Rgb(0, 0, 0),
        "white" | "w" => Rgb(255, 255, 255),
        "magenta" => Rgb(255, 0, 255),
        "m" => Rgb(191, 0, 191),
        "cyan" => Rgb(0, 255, 255),
        "c" => Rgb(0, 191, 191),
        "yellow" => Rgb(255, 255, 0),
        "y" => Rgb(191, 191, 0),
        "orange" => Rgb(255, 165, 0),
        "purple" => Rgb(128, 0, 128),
        "gray" | "grey" => GRAY,
        _ => return parse_cycle(&name).or_else(|| parse_hex(&name)),
    };
    Some(color)
}

fn parse_cycle(name: &str) -> Option<Rgb> {
    let index: usize = name.strip_prefix('c')?.parse().ok()?;
    COLOR_CYCLE.get(index).copied()
}

fn parse_hex(name: &str) -> Option<Rgb> {
    let hex = name.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Cross,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Markers(Marker),
    /// Thin guide line such as an axis or a margin marker
    Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
    pub style: SeriesStyle,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axes {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub grid: bool,
    pub x_scale: Scale,
    pub series: Vec<Series>,
    /// Set once a legend was requested; entries override series labels in order
    pub legend: Option<Vec<String>>,
    next_color: usize,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next colour from the cycle
    pub fn next_color(&mut self) -> Rgb {
        let color = COLOR_CYCLE[self.next_color % COLOR_CYCLE.len()];
        self.next_color += 1;
        color
    }

    pub fn add_line(&mut self, points: Vec<(f64, f64)>, color: Option<Rgb>, label: Option<String>) {
        let color = color.unwrap_or_else(|| self.next_color());
        self.series.push(Series {
            points,
            color,
            style: SeriesStyle::Line,
            label,
        });
    }

    pub fn add_markers(&mut self, points: Vec<(f64, f64)>, marker: Marker, color: Rgb) {
        self.series.push(Series {
            points,
            color,
            style: SeriesStyle::Markers(marker),
            label: None,
        });
    }

    pub fn add_reference(&mut self, points: Vec<(f64, f64)>) {
        self.series.push(Series {
            points,
            color: GRAY,
            style: SeriesStyle::Reference,
            label: None,
        });
    }

    /// Label shown in the legend for the series at `index`
    pub fn legend_label(&self, index: usize) -> Option<&str> {
        let legend = self.legend.as_ref()?;
        let labeled: Vec<usize> = self
            .series
            .iter()
            .enumerate()
            .filter(|(_, s)| s.style == SeriesStyle::Line)
            .map(|(i, _)| i)
            .collect();

        if legend.is_empty() {
            return self.series.get(index)?.label.as_deref();
        }
        let position = labeled.iter().position(|i| *i == index)?;
        legend.get(position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
            && self.title.is_none()
            && self.xlabel.is_none()
            && self.ylabel.is_none()
    }
}

/// A canvas with one or more vertically stacked axes. Commands apply to the current axes,
/// which is the last one created.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    id: u32,
    axes: Vec<Axes>,
}

impl Figure {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            axes: vec![Axes::new()],
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn current_axes(&mut self) -> &mut Axes {
        if self.axes.is_empty() {
            self.axes.push(Axes::new());
        }
        let last = self.axes.len() - 1;
        &mut self.axes[last]
    }

    pub fn axes_mut(&mut self, index: usize) -> Option<&mut Axes> {
        self.axes.get_mut(index)
    }

    /// Ensure the figure has exactly `count` stacked axes, clearing it when the layout changes
    pub fn use_stacked_axes(&mut self, count: usize) {
        if self.axes.len() != count {
            self.axes = (0..count).map(|_| Axes::new()).collect();
        }
    }
}
