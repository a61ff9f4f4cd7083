use argh::FromArgs;
use log::warn;

use base::options::{KMeansOptions, Reduction};

#[derive(Debug, Eq, PartialEq)]
pub struct ArgumentParseError;

#[derive(FromArgs, Debug, PartialEq)]
/// cluster a dataset with parallel Lloyd's k-means
pub struct Arguments {
    /// file containing data to be clustered
    #[argh(option, short = 'i')]
    pub input: String,

    /// file containing initial centers (default: the first `clusters` objects of the input)
    #[argh(option, short = 'c')]
    pub centers: Option<String>,

    /// input files are in binary format
    #[argh(switch, short = 'b')]
    pub binary: bool,

    /// number of clusters, must be greater than 1
    #[argh(option, short = 'n')]
    pub clusters: usize,

    /// convergence threshold on the fraction of reassigned objects (default: 0.001)
    #[argh(option, short = 't')]
    pub threshold: Option<f32>,

    /// number of worker threads (default: platform concurrency)
    #[argh(option, short = 'p')]
    pub threads: Option<u16>,

    /// use atomic updates instead of privatized reduction
    #[argh(switch, short = 'a')]
    pub atomic: bool,

    /// report timing results
    #[argh(switch, short = 'o')]
    pub timing: bool,

    /// quiet mode
    #[argh(switch, short = 'q')]
    pub quiet: bool,

    /// debug mode
    #[argh(switch, short = 'd')]
    pub debug: bool,

    /// clustering options in TOML string, overridden by the flags above
    #[argh(option)]
    pub options: Option<String>,
}

impl Arguments {
    pub fn get_options(&self) -> Result<KMeansOptions, ArgumentParseError> {
        let mut options: KMeansOptions = match &self.options {
            Some(toml_str) => match toml::from_str(toml_str) {
                Ok(options) => options,
                Err(err) => {
                    warn!("failed to parse the TOML clustering options: {err}");
                    return Err(ArgumentParseError);
                }
            },
            None => KMeansOptions::default(),
        };
        if let Some(threshold) = self.threshold {
            options.threshold = threshold;
        }
        if let Some(threads) = self.threads {
            options.threads = Some(threads);
        }
        if self.atomic {
            options.reduction = Reduction::Atomic;
        }
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ArgumentParseError> {
        if self.clusters <= 1 {
            warn!("the number of clusters must be greater than 1");
            return Err(ArgumentParseError);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Arguments {
        Arguments::from_args(&["lloyd"], args).unwrap()
    }

    #[test]
    fn flags() {
        let args = parse(&["-i", "data.txt", "-n", "4", "-t", "0.01", "-p", "8", "-a"]);
        assert_eq!(args.input, "data.txt");
        assert_eq!(args.clusters, 4);
        assert!(args.validate().is_ok());
        let options = args.get_options().unwrap();
        assert_eq!(options.threshold, 0.01);
        assert_eq!(options.threads, Some(8));
        assert_eq!(options.reduction, Reduction::Atomic);
        assert_eq!(options.max_iterations, 500);
    }

    #[test]
    fn defaults() {
        let args = parse(&["-i", "data.bin", "-b", "-n", "2"]);
        assert!(args.binary);
        assert_eq!(args.centers, None);
        let options = args.get_options().unwrap();
        assert_eq!(options.threshold, 0.001);
        assert_eq!(options.reduction, Reduction::Privatized);
        assert_eq!(options.threads, None);
    }

    #[test]
    fn flags_override_toml() {
        let args = parse(&[
            "-i",
            "data.txt",
            "-n",
            "3",
            "-t",
            "0.5",
            "--options",
            "threshold = 0.2\nmax_iterations = 20",
        ]);
        let options = args.get_options().unwrap();
        assert_eq!(options.threshold, 0.5);
        assert_eq!(options.max_iterations, 20);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse(&["-i", "data.txt", "-n", "1"]).validate(),
            Err(ArgumentParseError)
        );
        let args = parse(&["-i", "data.txt", "-n", "3", "--options", "clusters = 3"]);
        assert_eq!(args.get_options().err(), Some(ArgumentParseError));
    }
}
