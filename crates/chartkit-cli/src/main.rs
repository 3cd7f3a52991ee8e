use chartkit::ChartSpec;
use chartkit::render::raster::{BitmapFormat, RasterOptions, rasterize_chart_sync};
use serde::Serialize;
use std::io::{Read, Write};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Spec(chartkit::Error),
    Json(serde_json::Error),
    UnsupportedChart(String),
    NoImage,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Spec(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::UnsupportedChart(tag) => write!(f, "Unsupported chart type: {tag}"),
            CliError::NoImage => write!(
                f,
                "No image produced (empty data or the image backend failed)"
            ),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<chartkit::Error> for CliError {
    fn from(value: chartkit::Error) -> Self {
        Self::Spec(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Check,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Bitmap(BitmapFormat),
}

impl std::str::FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            other => other.parse::<BitmapFormat>().map(Self::Bitmap),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    raster: RasterOptions,
    out: Option<String>,
}

#[derive(Serialize)]
struct CheckOut<'a> {
    chart_type: &'a str,
    supported: bool,
    rows: usize,
    series: &'a [String],
    title: Option<&'a str>,
}

fn usage() -> &'static str {
    "chartkit-cli\n\
\n\
USAGE:\n\
  chartkit-cli [render] [--format svg|png|jpg] [--scale <n>] [--background <color>] [--quality <1-100>] [--out <path>] [<path>|-]\n\
  chartkit-cli check [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a chart spec JSON document; if <path> is omitted or '-', it is read from stdin.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
  - check prints the resolved chart type and row/series counts as JSON.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "check" => args.command = Command::Check,
            "--pretty" => args.pretty = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if let RenderFormat::Bitmap(format) = args.render_format {
                    args.raster.format = format;
                }
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.raster.scale = scale;
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.raster.background = if bg.trim().is_empty() {
                    None
                } else {
                    Some(bg.trim().to_string())
                };
            }
            "--quality" => {
                let Some(q) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let q = q.parse::<u8>().map_err(|_| CliError::Usage(usage()))?;
                if !(1..=100).contains(&q) {
                    return Err(CliError::Usage(usage()));
                }
                args.raster.jpeg_quality = q;
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let spec = ChartSpec::from_json_str(&text)?;

    match args.command {
        Command::Check => {
            let out = CheckOut {
                chart_type: spec.chart_type.as_str(),
                supported: spec.chart_type.is_supported(),
                rows: spec.data.len(),
                series: &spec.y_keys,
                title: spec.title.as_deref(),
            };
            write_json(&out, args.pretty)
        }
        Command::Render => {
            if !spec.chart_type.is_supported() {
                return Err(CliError::UnsupportedChart(spec.chart_type.to_string()));
            }

            match args.render_format {
                RenderFormat::Svg => {
                    let svg = chartkit::render::render_chart_svg(&spec);
                    write_text(&svg, args.out.as_deref())
                }
                RenderFormat::Bitmap(format) => {
                    let bytes = rasterize_chart_sync(&spec, &args.raster).ok_or(CliError::NoImage)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), format.extension())
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(out, bytes)?;
                    }
                    Ok(())
                }
            }
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ (CliError::UnsupportedChart(_) | CliError::NoImage)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
