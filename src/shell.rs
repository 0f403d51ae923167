//! Line-oriented interactive front end.
//!
//! Reads answers from any `BufRead` and writes prompts to any `Write`, so a
//! whole session can be scripted. Bad answers are reported and the shell goes
//! back to the menu; end of input ends the session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ground::Ground;
use crate::loader;
use crate::render::{MapRenderer, RenderOptions};
use crate::request::{parse_rgb, CustomGround, MapRequest};
use crate::tilemap::TileMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Basic,
    Chosen,
    Custom,
    ChosenAndCustom,
    Load,
    Exit,
}

impl Mode {
    fn parse(text: &str) -> Option<Mode> {
        match text.trim().trim_matches('\'') {
            "1" => Some(Mode::Basic),
            "2" => Some(Mode::Chosen),
            "3" => Some(Mode::Custom),
            "4" => Some(Mode::ChosenAndCustom),
            "5" => Some(Mode::Load),
            "6" => Some(Mode::Exit),
            _ => None,
        }
    }

    fn wants_builtin(self) -> bool {
        matches!(self, Mode::Chosen | Mode::ChosenAndCustom)
    }

    fn wants_custom(self) -> bool {
        matches!(self, Mode::Custom | Mode::ChosenAndCustom)
    }
}

pub struct Shell<R, W> {
    input: R,
    out: W,
    rng: ChaCha8Rng,
    render: RenderOptions,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Shell {
            input,
            out,
            rng: ChaCha8Rng::from_entropy(),
            render: RenderOptions::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.print_welcome()?;
        loop {
            match self.step() {
                Ok(true) => continue,
                Ok(false) => return Ok(()),
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    writeln!(self.out)?;
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Runs one menu action; `false` once the user asked to exit.
    fn step(&mut self) -> io::Result<bool> {
        self.print_menu()?;
        let answer = self.prompt(">>> Type number in: ")?;
        match Mode::parse(&answer) {
            Some(Mode::Exit) => {
                writeln!(self.out, "Exiting...")?;
                Ok(false)
            }
            Some(Mode::Load) => {
                self.load_map()?;
                Ok(true)
            }
            Some(mode) => {
                self.create_map(mode)?;
                Ok(true)
            }
            None => {
                writeln!(self.out, "Wrong typed in number: '{}'", answer.trim())?;
                Ok(true)
            }
        }
    }

    fn print_welcome(&mut self) -> io::Result<()> {
        writeln!(self.out, "=== Tile Map Generator ===")?;
        writeln!(
            self.out,
            "Create a tile map of any size from built-in and your own grounds."
        )?;
        let names: Vec<&str> = Ground::ALL.iter().map(|g| g.name()).collect();
        writeln!(self.out, "Built-in grounds: {}", names.join(", "))
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nMenu:")?;
        writeln!(self.out, "1. New map with basic grounds")?;
        writeln!(self.out, "2. New map with chosen grounds")?;
        writeln!(self.out, "3. New map with your own grounds")?;
        writeln!(self.out, "4. New map with chosen and your own grounds")?;
        writeln!(self.out, "5. Load and show a saved map")?;
        writeln!(self.out, "6. Exit")
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn ask_yes_no(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let answer = self.prompt(&format!("{question} (y/n) "))?;
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.out, "Please answer 'y' or 'n'")?,
            }
        }
    }

    fn ask_dimension(&mut self, label: &str) -> io::Result<Option<i64>> {
        let answer = self.prompt(&format!("Enter {label}: "))?;
        match answer.trim().parse::<i64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.out, "Wrong given {label}: '{}'", answer.trim())?;
                Ok(None)
            }
        }
    }

    fn ask_seed_limit(&mut self, label: &str) -> io::Result<Option<i64>> {
        if !self.ask_yes_no(&format!("Do you want to specify '{label}'?"))? {
            return Ok(None);
        }
        let answer = self.prompt(&format!("Enter value of '{label}': "))?;
        match answer.trim().parse::<i64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.out, "Wrong given value, '{label}' is left unset")?;
                Ok(None)
            }
        }
    }

    fn ask_grounds(&mut self) -> io::Result<Vec<String>> {
        let answer = self.prompt("Choose grounds (comma separated): ")?;
        Ok(answer
            .replace('\'', "")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Collects custom grounds until the user stops; `false` on a malformed
    /// colour.
    fn ask_custom_grounds(&mut self, request: &mut MapRequest) -> io::Result<bool> {
        loop {
            let name = self.prompt("Enter name of custom ground: ")?;
            let rgb_text = self.prompt("Enter RGB tuple of custom ground: ")?;
            match parse_rgb(&rgb_text) {
                Ok(rgb) => request.add_custom(CustomGround::new(name.trim(), &rgb)),
                Err(err) => {
                    writeln!(self.out, "{}", capitalize(err.reason()))?;
                    return Ok(false);
                }
            }
            if !self.ask_yes_no("Do you want to enter another custom ground?")? {
                return Ok(true);
            }
        }
    }

    fn create_map(&mut self, mode: Mode) -> io::Result<()> {
        let Some(width) = self.ask_dimension("width")? else {
            return Ok(());
        };
        let Some(height) = self.ask_dimension("height")? else {
            return Ok(());
        };

        let mut request = MapRequest::new(width, height);
        request.min_seeds = self.ask_seed_limit("min_seeds")?;
        request.max_seeds = self.ask_seed_limit("max_seeds")?;
        if mode.wants_builtin() {
            request.grounds = self.ask_grounds()?;
        }
        if mode.wants_custom() && !self.ask_custom_grounds(&mut request)? {
            return Ok(());
        }

        let map = match TileMap::generate(&request, &mut self.rng) {
            Ok(map) => map,
            Err(err) => {
                writeln!(self.out, "{}", capitalize(err.reason()))?;
                return Ok(());
            }
        };

        writeln!(
            self.out,
            "\nGenerated {}x{} map from {} seeds.",
            map.width,
            map.height,
            map.seeds().len()
        )?;
        let area = map.width * map.height;
        for share in map.color_counts() {
            writeln!(
                self.out,
                "  {} {:?} - {:.1}%",
                share.label(),
                share.color,
                share.percent(area)
            )?;
        }

        if self.ask_yes_no("Do you want to visualize your tile map?")? {
            MapRenderer::display(&map, &mut self.out)?;
        }
        if self.ask_yes_no("Do you want to save your tile map?")? {
            let path = self.ask_path("Enter name of a file: ")?;
            match MapRenderer::save(&map, &path, self.render) {
                Ok(()) => writeln!(self.out, "Map saved as: {}", path.display())?,
                Err(err) => writeln!(self.out, "Error saving map: {err}")?,
            }
        }
        Ok(())
    }

    fn ask_path(&mut self, text: &str) -> io::Result<PathBuf> {
        loop {
            let answer = self.prompt(text)?.replace('\'', "");
            if !answer.trim().is_empty() {
                return Ok(PathBuf::from(answer.trim()));
            }
        }
    }

    fn load_map(&mut self) -> io::Result<()> {
        let path = self.ask_path("Enter name of file: ")?;
        match loader::load(&path) {
            Ok(img) => loader::show(&img, &mut self.out),
            Err(err) => writeln!(self.out, "{}", capitalize(&err.to_string())),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> String {
        let mut out = Vec::new();
        Shell::new(script.as_bytes(), &mut out)
            .with_seed(17)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_option() {
        let text = run_script("6\n");
        assert!(text.contains("Tile Map Generator"));
        assert!(text.contains("Exiting..."));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let text = run_script("1\n20\n");
        assert!(text.contains("Enter height: "));
    }

    #[test]
    fn test_wrong_menu_number() {
        let text = run_script("9\n6\n");
        assert!(text.contains("Wrong typed in number: '9'"));
    }

    #[test]
    fn test_basic_map_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basic.png");
        let script = format!("1\n20\n30\nn\nn\ny\ny\n{}\n6\n", path.display());
        let text = run_script(&script);
        assert!(text.contains("Generated 20x30 map"));
        assert!(text.contains("water"));
        assert!(text.contains("\x1b[48;2;"));
        assert!(text.contains("Map saved as:"));
        assert!(path.exists());
    }

    #[test]
    fn test_unsupported_extension_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basic.unknown");
        let script = format!("1\n10\n10\nn\nn\nn\ny\n{}\n6\n", path.display());
        let text = run_script(&script);
        assert!(text.contains("Error saving map: unknown file extension"));
        assert!(text.contains("Exiting..."));
    }

    #[test]
    fn test_chosen_grounds_with_seed_limits() {
        let script = "2\n20\n30\ny\n10\ny\n20\nwater, land, 'sand'\nn\nn\n6\n";
        let text = run_script(script);
        assert!(text.contains("sand [255, 255, 153]"));
    }

    #[test]
    fn test_unknown_ground_is_reported() {
        let text = run_script("2\n10\n10\nn\nn\nocean\n6\n");
        assert!(text.contains("Ground 'ocean' is not available"));
        assert!(text.contains("Exiting..."));
    }

    #[test]
    fn test_custom_grounds() {
        let script = "3\n10\n10\nn\nn\nblack\n(0, 0, 0)\ny\nred\n(255, 0, 0)\nn\nn\nn\n6\n";
        let text = run_script(script);
        assert!(text.contains("black [0, 0, 0]"));
        assert!(text.contains("red [255, 0, 0]"));
    }

    #[test]
    fn test_shared_color_listed_once() {
        let script = "4\n12\n12\nn\nn\nwater, snow\nwhite\n(255, 255, 255)\nn\nn\nn\n6\n";
        let text = run_script(script);
        assert!(text.contains("snow/white [255, 255, 255]"));
        assert_eq!(text.matches("[255, 255, 255]").count(), 1);
    }

    #[test]
    fn test_out_of_range_custom_ground() {
        let text = run_script("3\n10\n10\nn\nn\nblack\n(-1, 0, 300)\nn\n6\n");
        assert!(text.contains("outside 0..=255"));
    }

    #[test]
    fn test_malformed_rgb() {
        let text = run_script("3\n10\n10\nn\nn\nblack\n0 0 0\n6\n");
        assert!(text.contains("Wrong given RGB tuple"));
        assert!(text.contains("Exiting..."));
    }

    #[test]
    fn test_bad_dimension() {
        let text = run_script("1\nwide\n6\n");
        assert!(text.contains("Wrong given width: 'wide'"));
    }

    #[test]
    fn test_load_missing_file() {
        let text = run_script("5\n/definitely/not/here.png\n6\n");
        assert!(text.contains("does not exist"));
    }
}
