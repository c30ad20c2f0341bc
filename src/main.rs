use clap::{value_t, App, AppSettings, Arg, ArgMatches, SubCommand};
use csrgraph::data::{verify, BinaryPaths, Graph, GraphLoader};
use derive_more::Display;
use std::error::Error;

#[derive(Debug, Display, PartialEq)]
enum CliError {
    #[display(
        fmt = "expected one text graph or three binary files (degree, edge, label), found {} inputs",
        _0
    )]
    InputCount(usize),
}

impl std::error::Error for CliError {}

fn load(matches: &ArgMatches) -> Result<Graph, Box<dyn Error>> {
    let mut loader = GraphLoader::new().optimized(matches.is_present("optimized"));
    if matches.is_present("label-limit") {
        loader = loader.label_limit(value_t!(matches, "label-limit", u32)?);
    }
    let inputs: Vec<_> = matches
        .values_of("INPUT")
        .map(|values| values.collect())
        .unwrap_or_default();
    match inputs.as_slice() {
        [text] => Ok(loader.load_text(text)?),
        [degrees, edges, labels] => {
            Ok(loader.load_binary(&BinaryPaths::new(degrees, edges, labels))?)
        }
        _ => Err(CliError::InputCount(inputs.len()).into()),
    }
}

fn handle_info(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    println!("{}", load(matches)?.info());
    Ok(())
}

fn handle_convert(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let graph = load(matches)?;
    let paths = BinaryPaths::new(
        matches.value_of("degree").unwrap_or_default(),
        matches.value_of("edge").unwrap_or_default(),
        matches.value_of("label").unwrap_or_default(),
    );
    graph.store_binary(&paths)?;
    println!("{}", graph.info());
    Ok(())
}

fn handle_core(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let graph = load(matches)?;
    let core_table = graph.core_table();
    println!("2-Core Size: {}", core_table.two_core_size());
    println!("Degeneracy: {}", core_table.degeneracy());
    Ok(())
}

fn handle_check(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let graph = load(matches)?;
    verify(&graph)?;
    println!("ok");
    Ok(())
}

fn input_arg() -> Arg<'static, 'static> {
    Arg::with_name("INPUT")
        .help("A text graph, or the degree, edge and label files of a binary graph")
        .required(true)
        .min_values(1)
        .max_values(3)
}

fn output_arg(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .value_name("FILE")
        .help(help)
        .takes_value(true)
        .required(true)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let matches = App::new("csrgraph")
        .about("Loads, converts and inspects labeled data graphs")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("optimized")
                .long("optimized")
                .help("Builds neighbor label frequencies and label-sorted adjacency")
                .global(true),
        )
        .arg(
            Arg::with_name("label-limit")
                .long("label-limit")
                .value_name("N")
                .help("Rejects label ids greater than or equal to N")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Prints the graph metadata")
                .arg(input_arg()),
        )
        .subcommand(
            SubCommand::with_name("convert")
                .about("Stores the graph in the binary layout")
                .arg(input_arg())
                .arg(output_arg("degree", "Degree file to write"))
                .arg(output_arg("edge", "Edge file to write"))
                .arg(output_arg("label", "Label file to write")),
        )
        .subcommand(
            SubCommand::with_name("core")
                .about("Prints the 2-core size and the degeneracy")
                .arg(input_arg()),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Checks the invariants of the loaded graph")
                .arg(input_arg()),
        )
        .get_matches();
    if let Some(matches) = matches.subcommand_matches("info") {
        handle_info(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("convert") {
        handle_convert(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("core") {
        handle_core(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("check") {
        handle_check(matches)?;
    }
    Ok(())
}
