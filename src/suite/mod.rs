//! Test-suite generation driven by a `config.txt` in the test directory.
//!
//! Settings accumulate line by line and every `generate = True` produces `num_circuits`
//! circuits with the current values. Artifacts are numbered files under `key/`, `circuit/`,
//! `input/` and `output/`; `test.txt` lists them in the order a test run consumes them.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::{
    Circuit,
    generator::{CircuitMaker, Family, GateChoice, GeneratorParams, InputVector},
};

pub mod config;
pub mod errors;

pub use config::{Directive, parse_config};
pub use errors::{ConfigError, SuiteError};

type Error = SuiteError;

pub const CONFIG_FILE: &str = "config.txt";
pub const MANIFEST_FILE: &str = "test.txt";

const KEY_DIR: &str = "key";
const CIRCUIT_DIR: &str = "circuit";
const INPUT_DIR: &str = "input";
const OUTPUT_DIR: &str = "output";

/// Counts of the artifacts written for one test directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub keys: usize,
    pub circuits: usize,
    pub inputs: usize,
}

/// Reads `<test_dir>/config.txt` and writes the suite next to it. Manifest entries are
/// `<prefix>/<test dir name>/<kind>/<n>`.
pub fn generate_suite(test_dir: impl AsRef<Path>, prefix: &str) -> Result<SuiteSummary, Error> {
    let test_dir = test_dir.as_ref();
    let config_path = test_dir.join(CONFIG_FILE);
    let text = fs::read_to_string(&config_path).map_err(|source| Error::ReadConfig {
        path: config_path.clone(),
        source,
    })?;
    let directives = parse_config(&text)?;
    debug!("{}: {} directives", config_path.display(), directives.len());

    SuiteGenerator::new(test_dir, prefix, ChaCha20Rng::from_entropy())?.run(&directives)
}

/// Settings that survive between `generate` directives.
#[derive(Clone, Debug, Default)]
struct Settings {
    family: Option<u8>,
    test_type: Option<GateChoice>,
    width: Option<usize>,
    gates: Option<usize>,
    gate_fanin: Option<f64>,
    xor_gates: Option<usize>,
    xor_fanin: Option<f64>,
    depth: Option<usize>,
    num_circuits: Option<usize>,
    num_inputs: Option<usize>,
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, Error> {
    value.ok_or(Error::MissingSetting(name))
}

impl Settings {
    fn update(&mut self, directive: &Directive) {
        match *directive {
            Directive::Family(family) => self.family = Some(family),
            Directive::TestType(choice) => self.test_type = Some(choice),
            Directive::Width(width) => self.width = Some(width),
            Directive::Gates(gates) => self.gates = Some(gates),
            Directive::GateFanin(fanin) => self.gate_fanin = Some(fanin),
            Directive::XorGates(gates) => self.xor_gates = Some(gates),
            Directive::XorFanin(fanin) => self.xor_fanin = Some(fanin),
            Directive::Depth(depth) => self.depth = Some(depth),
            Directive::NumCircuits(n) => self.num_circuits = Some(n),
            Directive::NumInputs(n) => self.num_inputs = Some(n),
            Directive::Seed(_) | Directive::Key(_) | Directive::Generate(_) => {}
        }
    }

    fn params(&self) -> Result<GeneratorParams, Error> {
        let family = match required(self.family, "fam")? {
            1 => Family::Flat {
                gates: required(self.gates, "G")?,
                fanin: required(self.gate_fanin, "fg")?,
            },
            2 => Family::XorSandwich {
                gates: required(self.gates, "G")?,
                fanin: required(self.gate_fanin, "fg")?,
                xor_gates: required(self.xor_gates, "X")?,
                xor_fanin: required(self.xor_fanin, "fx")?,
            },
            3 => Family::Ladder {
                depth: required(self.depth, "D")?,
            },
            other => return Err(Error::UnknownFamily(other)),
        };

        Ok(GeneratorParams::new(
            required(self.width, "W")?,
            family,
            required(self.test_type, "test_type")?,
        ))
    }
}

/// Writes the artifacts of one test directory.
pub struct SuiteGenerator {
    test_dir: PathBuf,
    /// `<prefix>/<test dir name>`, the root of every manifest entry.
    manifest_root: String,
    manifest: BufWriter<File>,
    rng: ChaCha20Rng,
    settings: Settings,
    summary: SuiteSummary,
}

impl SuiteGenerator {
    /// Creates the artifact directories and an empty `test.txt`.
    pub fn new(test_dir: impl Into<PathBuf>, prefix: &str, rng: ChaCha20Rng) -> Result<Self, Error> {
        let test_dir = test_dir.into();
        for dir in [KEY_DIR, CIRCUIT_DIR, INPUT_DIR, OUTPUT_DIR] {
            fs::create_dir_all(test_dir.join(dir))?;
        }
        let manifest = BufWriter::new(File::create(test_dir.join(MANIFEST_FILE))?);

        let name = test_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| test_dir.display().to_string());

        Ok(Self {
            manifest_root: format!("{prefix}/{name}"),
            test_dir,
            manifest,
            rng,
            settings: Settings::default(),
            summary: SuiteSummary::default(),
        })
    }

    pub fn run(mut self, directives: &[Directive]) -> Result<SuiteSummary, Error> {
        for directive in directives {
            self.apply(directive)?;
        }
        self.manifest.flush()?;

        info!(
            "{}: {} keys, {} circuits, {} inputs",
            self.test_dir.display(),
            self.summary.keys,
            self.summary.circuits,
            self.summary.inputs
        );
        Ok(self.summary)
    }

    fn apply(&mut self, directive: &Directive) -> Result<(), Error> {
        match directive {
            Directive::Seed(seed) => self.rng = ChaCha20Rng::seed_from_u64(*seed),
            Directive::Key(key) => self.write_key(key)?,
            Directive::Generate(true) => self.make_circuits()?,
            Directive::Generate(false) => {}
            setting => self.settings.update(setting),
        }
        Ok(())
    }

    fn artifact_path(&self, dir: &str, number: usize) -> PathBuf {
        self.test_dir.join(dir).join(number.to_string())
    }

    fn record(&mut self, entry: &str, dir: &str, number: usize) -> Result<(), Error> {
        writeln!(self.manifest, "{entry}\n{}/{dir}/{number}", self.manifest_root)?;
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<(), Error> {
        self.summary.keys += 1;
        let number = self.summary.keys;
        fs::write(self.artifact_path(KEY_DIR, number), key)?;
        self.record("KEY", KEY_DIR, number)
    }

    fn write_input(&mut self, input: &InputVector, output: bool) -> Result<usize, Error> {
        self.summary.inputs += 1;
        let number = self.summary.inputs;
        fs::write(self.artifact_path(INPUT_DIR, number), input.to_string())?;
        fs::write(
            self.artifact_path(OUTPUT_DIR, number),
            u8::from(output).to_string(),
        )?;
        Ok(number)
    }

    /// One circuit per `num_circuits`, each followed by `num_inputs` inputs: the one it was
    /// balanced for, then fresh random ones whose outputs come from evaluating the written
    /// circuit.
    fn make_circuits(&mut self) -> Result<(), Error> {
        let params = self.settings.params()?;
        let num_circuits = required(self.settings.num_circuits, "num_circuits")?;
        let num_inputs = required(self.settings.num_inputs, "num_inputs")?;
        let maker = CircuitMaker::new(params)?;

        for _ in 0..num_circuits {
            self.summary.circuits += 1;
            let circuit_number = self.summary.circuits;
            let circuit_path = self.artifact_path(CIRCUIT_DIR, circuit_number);

            let mut out = BufWriter::new(File::create(&circuit_path)?);
            let generated = maker.generate(&mut self.rng, &mut out)?;
            drop(out);

            let input_number = self.write_input(&generated.input, generated.output)?;
            self.record("CIRCUIT", CIRCUIT_DIR, circuit_number)?;
            self.record("INPUT", INPUT_DIR, input_number)?;

            if num_inputs < 2 {
                continue;
            }

            let mut circuit = Circuit::parse_file(&circuit_path)?;
            for _ in 1..num_inputs {
                let input = InputVector::random(params.width, &mut self.rng);
                let output = circuit.evaluate(&input.to_bools())?;
                let input_number = self.write_input(&input, output)?;
                self.record("INPUT", INPUT_DIR, input_number)?;
            }
            debug!(
                "circuit {}: {} inputs",
                circuit_path.display(),
                num_inputs
            );
        }

        Ok(())
    }
}
