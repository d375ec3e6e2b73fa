extern crate clap;
extern crate env_logger;
extern crate log;
extern crate shapeshifter;

mod commands;

use clap::{App, Arg, ArgMatches, SubCommand};
use commands::*;

use shapeshifter::math::{point, Angle, Transform};
use shapeshifter::PathData;

use log::debug;

use std::fs::File;
use std::io::prelude::*;
use std::io::{stderr, stdout};
use std::process;

fn main() {
    env_logger::init();

    let matches = App::new("Shapeshifter command-line interface")
        .version("0.1")
        .about("Measures, edits and morphs SVG paths")
        .subcommand(SubCommand::with_name("info")
            .about("Prints the length, bounds and size of the path")
        )
        .subcommand(SubCommand::with_name("normalize")
            .about("Prints the path using absolute commands only")
        )
        .subcommand(SubCommand::with_name("project")
            .about("Finds the point of the path closest to a position")
            .arg(Arg::with_name("X")
                .short("x")
                .long("x")
                .help("x coordinate of the position")
                .value_name("X")
                .takes_value(true)
                .allow_hyphen_values(true)
                .required(true)
            )
            .arg(Arg::with_name("Y")
                .short("y")
                .long("y")
                .help("y coordinate of the position")
                .value_name("Y")
                .takes_value(true)
                .allow_hyphen_values(true)
                .required(true)
            )
        )
        .subcommand(SubCommand::with_name("split")
            .about("Splits a command in two")
            .arg(Arg::with_name("SUB_PATH")
                .short("s")
                .long("sub-path")
                .help("Index of the sub-path (0 by default)")
                .value_name("INDEX")
                .takes_value(true)
            )
            .arg(Arg::with_name("COMMAND")
                .short("c")
                .long("command")
                .help("Index of the command in the sub-path")
                .value_name("INDEX")
                .takes_value(true)
                .required(true)
            )
            .arg(Arg::with_name("T")
                .short("t")
                .long("t")
                .help("Where to split the command, between 0 and 1 (0.5 by default)")
                .value_name("T")
                .takes_value(true)
            )
        )
        .subcommand(SubCommand::with_name("reverse")
            .about("Reverses the direction of each sub-path")
        )
        .subcommand(SubCommand::with_name("shift")
            .about("Rotates the commands of each closed sub-path")
            .arg(Arg::with_name("BACK")
                .short("b")
                .long("back")
                .help("Shifts backward instead of forward")
            )
        )
        .subcommand(SubCommand::with_name("morph")
            .about("Interpolates between the path and another one")
            .arg(Arg::with_name("TO")
                .long("to")
                .help("The path to morph into")
                .value_name("PATH")
                .takes_value(true)
                .required(true)
            )
            .arg(Arg::with_name("FRACTION")
                .short("f")
                .long("fraction")
                .help("Interpolation fraction (0.5 by default)")
                .value_name("FRACTION")
                .takes_value(true)
                .allow_hyphen_values(true)
            )
        )
        .subcommand(SubCommand::with_name("transform")
            .about("Applies transforms, in the order they are given")
            .arg(Arg::with_name("TRANSLATE")
                .long("translate")
                .help("Translation, as \"x,y\"")
                .value_name("X,Y")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .allow_hyphen_values(true)
            )
            .arg(Arg::with_name("SCALE")
                .long("scale")
                .help("Scale, as \"s\" or \"sx,sy\"")
                .value_name("SX,SY")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .allow_hyphen_values(true)
            )
            .arg(Arg::with_name("ROTATE")
                .long("rotate")
                .help("Rotation around the origin, in degrees")
                .value_name("DEGREES")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .allow_hyphen_values(true)
            )
        )
        .arg(Arg::with_name("PATH")
            .value_name("PATH")
            .help("An SVG path")
            .takes_value(true)
            .required(false)
        )
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .short("i")
            .long("input")
            .value_name("FILE")
            .takes_value(true)
            .required(false)
        )
        .arg(Arg::with_name("OUTPUT")
            .help("Sets the output file to use")
            .value_name("FILE")
            .short("o")
            .long("output")
            .takes_value(true)
            .required(false)
        )
        .get_matches();

    let mut input_buffer = matches.value_of("PATH").unwrap_or("").to_string();

    if let Some(input_file) = matches.value_of("INPUT") {
        let read = File::open(input_file).and_then(|mut file| file.read_to_string(&mut input_buffer));
        if let Err(e) = read {
            fail(&format!("Cannot read file {}: {}", input_file, e));
        }
    }

    let mut output: Box<dyn Write> = Box::new(stdout());

    if let Some(output_file) = matches.value_of("OUTPUT") {
        match File::create(output_file) {
            Ok(file) => {
                output = Box::new(file);
            }
            Err(e) => fail(&format!("Cannot create file {}: {}", output_file, e)),
        }
    }

    let path = match PathData::parse(input_buffer.trim()) {
        Ok(path) => path,
        Err(e) => fail(&e.to_string()),
    };

    let operation = match get_operation(&matches) {
        Ok(operation) => operation,
        Err(msg) => fail(&msg),
    };

    debug!("input path: {}", path);

    match execute(PathCmd { path, operation }) {
        Ok(text) => {
            if let Err(e) = output.write_all(text.as_bytes()) {
                fail(&e.to_string());
            }
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(msg: &str) -> ! {
    let _ = writeln!(&mut stderr(), "{}", msg);
    process::exit(1);
}

fn get_operation(matches: &ArgMatches) -> Result<Operation, String> {
    let operation = match matches.subcommand() {
        ("info", _) | ("", _) => Operation::Info,
        ("normalize", _) => Operation::Normalize,
        ("project", Some(m)) => Operation::Project {
            position: point(get_number(m, "X", None)?, get_number(m, "Y", None)?),
        },
        ("split", Some(m)) => Operation::Split {
            sub_path: get_index(m, "SUB_PATH", Some(0))?,
            command: get_index(m, "COMMAND", None)?,
            t: get_number(m, "T", Some(0.5))?,
        },
        ("reverse", _) => Operation::Reverse,
        ("shift", Some(m)) => Operation::Shift {
            back: m.is_present("BACK"),
        },
        ("morph", Some(m)) => {
            let to = m.value_of("TO").unwrap_or("");
            Operation::Morph {
                to: PathData::parse(to).map_err(|e| e.to_string())?,
                fraction: get_number(m, "FRACTION", Some(0.5))?,
            }
        }
        ("transform", Some(m)) => Operation::Transform {
            transforms: get_transforms(m)?,
        },
        (name, _) => {
            return Err(format!("Unknown command {}", name));
        }
    };

    Ok(operation)
}

fn get_number(matches: &ArgMatches, name: &str, default: Option<f32>) -> Result<f32, String> {
    match (matches.value_of(name), default) {
        (Some(value), _) => value
            .parse()
            .map_err(|_| format!("Invalid number {:?} for {}", value, name)),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(format!("Missing value for {}", name)),
    }
}

fn get_index(matches: &ArgMatches, name: &str, default: Option<usize>) -> Result<usize, String> {
    match (matches.value_of(name), default) {
        (Some(value), _) => value
            .parse()
            .map_err(|_| format!("Invalid index {:?} for {}", value, name)),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(format!("Missing value for {}", name)),
    }
}

// Collects the transforms in the order they appear on the command line.
fn get_transforms(matches: &ArgMatches) -> Result<Vec<Transform>, String> {
    let mut transforms = Vec::new();
    for name in &["TRANSLATE", "SCALE", "ROTATE"] {
        if let (Some(indices), Some(values)) = (matches.indices_of(name), matches.values_of(name)) {
            for (index, value) in indices.zip(values) {
                transforms.push((index, parse_transform(name, value)?));
            }
        }
    }

    transforms.sort_by_key(|&(index, _)| index);

    Ok(transforms.into_iter().map(|(_, transform)| transform).collect())
}

fn parse_transform(kind: &str, value: &str) -> Result<Transform, String> {
    let invalid = || format!("Invalid {} value {:?}", kind.to_lowercase(), value);
    let numbers: Vec<f32> = value
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;

    let transform = match (kind, &numbers[..]) {
        ("TRANSLATE", &[x, y]) => Transform::translation(x, y),
        ("SCALE", &[s]) => Transform::scale(s, s),
        ("SCALE", &[sx, sy]) => Transform::scale(sx, sy),
        ("ROTATE", &[degrees]) => Transform::rotation(Angle::degrees(degrees)),
        _ => {
            return Err(invalid());
        }
    };

    Ok(transform)
}

#[cfg(test)]
use shapeshifter::math::vector;

#[test]
fn transform_values() {
    let t = parse_transform("TRANSLATE", "1,-2").unwrap();
    assert_eq!(t.transform_point(point(0.0, 0.0)), point(1.0, -2.0));

    let t = parse_transform("SCALE", "3").unwrap();
    assert_eq!(t.transform_vector(vector(1.0, 1.0)), vector(3.0, 3.0));

    let t = parse_transform("SCALE", "2, 4").unwrap();
    assert_eq!(t.transform_vector(vector(1.0, 1.0)), vector(2.0, 4.0));

    let t = parse_transform("ROTATE", "90").unwrap();
    let p = t.transform_point(point(1.0, 0.0));
    assert!((p - point(0.0, 1.0)).length() < 1e-6);

    assert!(parse_transform("TRANSLATE", "1").is_err());
    assert!(parse_transform("ROTATE", "abc").is_err());
}

#[test]
fn transforms_keep_command_line_order() {
    let app = App::new("test").subcommand(
        SubCommand::with_name("transform")
            .arg(Arg::with_name("TRANSLATE").long("translate").takes_value(true)
                .multiple(true).number_of_values(1).allow_hyphen_values(true))
            .arg(Arg::with_name("SCALE").long("scale").takes_value(true)
                .multiple(true).number_of_values(1).allow_hyphen_values(true))
            .arg(Arg::with_name("ROTATE").long("rotate").takes_value(true)
                .multiple(true).number_of_values(1).allow_hyphen_values(true)),
    );
    let matches = app.get_matches_from(vec![
        "test", "transform", "--scale", "2", "--translate", "1,0",
    ]);
    let m = matches.subcommand_matches("transform").unwrap();
    let transforms = get_transforms(m).unwrap();
    assert_eq!(transforms.len(), 2);

    // Scale first, then translate.
    let p = transforms[0].then(&transforms[1]).transform_point(point(1.0, 1.0));
    assert_eq!(p, point(3.0, 2.0));
}
