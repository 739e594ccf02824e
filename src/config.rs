//! Mechanism for loading and sharing the selection configuration

use crate::{
    event::FinalState,
    evcut::{EventCut, LeptonCut, MassWindow, PtCut},
    numeric::Float,
};
use eyre::{ensure, eyre, Result, WrapErr};
use std::{fs::File, io::Read, str::FromStr};
use tracing::info;

/// Analysis configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Final states to be reconstructed
    pub final_states: Vec<FinalState>,

    /// Cuts on the leptons and Z candidates
    pub event_cut: EventCut,
}
//
impl Default for Configuration {
    fn default() -> Self {
        Self {
            final_states: FinalState::ALL.to_vec(),
            event_cut: EventCut::default(),
        }
    }
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(file_name: &str) -> Result<Self> {
        // Read out the configuration file or die trying
        let config_str = {
            let mut config_file = File::open(file_name)
                .wrap_err_with(|| format!("Could not open configuration file {file_name}"))?;
            let mut buffer = String::new();
            config_file
                .read_to_string(&mut buffer)
                .wrap_err_with(|| format!("Could not read configuration file {file_name}"))?;
            buffer
        };
        Self::parse(&config_str)
    }

    /// Decode and check a configuration, then print it out
    ///
    /// Configuration items are the first non-whitespace chunk of text of each
    /// line, in struct field order. Blank lines are ignored, and so is
    /// everything which follows an item on its line.
    ///
    pub fn parse(config_str: &str) -> Result<Self> {
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // Fetch the next item, tagged with the name of the field it fills
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| eyre!("Missing configuration of {}", name))
        };

        let config = Configuration {
            final_states: next_item("final_states")?.parse_list::<FinalState>()?,
            event_cut: EventCut {
                muon: LeptonCut {
                    max_iso: next_item("muon.max_iso")?.parse::<Float>()?,
                    min_pt: next_item("muon.min_pt")?.parse::<Float>()?,
                    max_abs_eta: next_item("muon.max_abs_eta")?.parse::<Float>()?,
                },
                electron: LeptonCut {
                    max_iso: next_item("electron.max_iso")?.parse::<Float>()?,
                    min_pt: next_item("electron.min_pt")?.parse::<Float>()?,
                    max_abs_eta: next_item("electron.max_abs_eta")?.parse::<Float>()?,
                },
                max_sip: next_item("max_sip")?.parse::<Float>()?,
                max_abs_dxy: next_item("max_abs_dxy")?.parse::<Float>()?,
                max_abs_dz: next_item("max_abs_dz")?.parse::<Float>()?,
                pt: PtCut {
                    leading: next_item("pt.leading")?.parse::<Float>()?,
                    subleading: next_item("pt.subleading")?.parse::<Float>()?,
                },
                min_delta_r: next_item("min_delta_r")?.parse::<Float>()?,
                z_close_mass: MassWindow {
                    min: next_item("z_close_mass.min")?.parse::<Float>()?,
                    max: next_item("z_close_mass.max")?.parse::<Float>()?,
                },
                z_far_mass: MassWindow {
                    min: next_item("z_far_mass.min")?.parse::<Float>()?,
                    max: next_item("z_far_mass.max")?.parse::<Float>()?,
                },
            },
        };
        config.print();
        config.check()?;
        Ok(config)
    }

    /// Sanity checks which apply to any configuration
    pub fn check(&self) -> Result<()> {
        ensure!(
            !self.final_states.is_empty(),
            "Please select at least one final state"
        );
        let cut = &self.event_cut;
        for (name, window) in [("close", cut.z_close_mass), ("far", cut.z_far_mass)] {
            ensure!(
                window.min < window.max,
                "Empty mass window for the {} Z candidate: [{}, {}]",
                name,
                window.min,
                window.max
            );
        }
        ensure!(
            cut.pt.leading >= cut.pt.subleading,
            "Leading lepton pT threshold must not be below the subleading one"
        );
        ensure!(
            cut.max_sip > 0. && cut.max_abs_dxy > 0. && cut.max_abs_dz > 0.,
            "Vertex compatibility cuts must be positive"
        );
        Ok(())
    }

    /// Comma-separated final state names, as written in configuration files
    pub fn final_state_names(&self) -> String {
        self.final_states
            .iter()
            .map(|state| state.name())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Log the configuration, one item per line
    pub fn print(&self) {
        let cut = &self.event_cut;
        info!("FINAL STATES    : {}", self.final_state_names());
        info!("MUON ISO MAX    : {}", cut.muon.max_iso);
        info!("MUON PT MIN     : {}", cut.muon.min_pt);
        info!("MUON |ETA| MAX  : {}", cut.muon.max_abs_eta);
        info!("ELEC ISO MAX    : {}", cut.electron.max_iso);
        info!("ELEC PT MIN     : {}", cut.electron.min_pt);
        info!("ELEC |ETA| MAX  : {}", cut.electron.max_abs_eta);
        info!("SIP MAX         : {}", cut.max_sip);
        info!("|DXY| MAX       : {}", cut.max_abs_dxy);
        info!("|DZ| MAX        : {}", cut.max_abs_dz);
        info!("PT LEADING      : {}", cut.pt.leading);
        info!("PT SUBLEADING   : {}", cut.pt.subleading);
        info!("DELTA R MIN     : {}", cut.min_delta_r);
        info!("Z CLOSE MASS    : [{}, {}]", cut.z_close_mass.min, cut.z_close_mass.max);
        info!("Z FAR MASS      : [{}, {}]", cut.z_far_mass.min, cut.z_far_mass.max);
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        parse_tagged(self.name, self.data)
    }

    /// Parse a comma-separated list of values
    fn parse_list<T: FromStr>(self) -> Result<Vec<T>>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        self.data
            .split(',')
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| parse_tagged(self.name, chunk))
            .collect()
    }
}

fn parse_tagged<T: FromStr>(name: &'static str, data: &str) -> Result<T>
where
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    data.parse::<T>()
        .wrap_err_with(|| format!("Could not parse configuration of {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_CONFIG: &str = "\
FourMuons,FourElectrons,TwoMuonsTwoElectrons   final states
0.40      muon isolation
5         muon pT
2.4       muon |eta|

0.40      electron isolation
7         electron pT
2.5       electron |eta|

4         SIP
0.5       |dxy|
1.0       |dz|
20        leading pT
10        subleading pT
0.02      delta R
40        Z close mass min
120       Z close mass max
12        Z far mass min
120       Z far mass max
";

    #[test]
    fn default_configuration_round_trip() {
        let config = Configuration::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Configuration::default());
        assert_eq!(config.check().ok(), Some(()));
    }

    #[test]
    fn final_state_subset() {
        let config_str = DEFAULT_CONFIG.replacen(
            "FourMuons,FourElectrons,TwoMuonsTwoElectrons",
            "TwoMuonsTwoElectrons",
            1,
        );
        let config = Configuration::parse(&config_str).unwrap();
        assert_eq!(config.final_states, [FinalState::TwoMuonsTwoElectrons]);
        assert_eq!(config.final_state_names(), "TwoMuonsTwoElectrons");
        assert_eq!(
            Configuration::default().final_state_names(),
            "FourMuons,FourElectrons,TwoMuonsTwoElectrons"
        );
    }

    #[test]
    fn errors_name_the_field() {
        let truncated: String = DEFAULT_CONFIG.lines().take(5).collect::<Vec<_>>().join("\n");
        let err = Configuration::parse(&truncated).unwrap_err();
        assert_eq!(err.to_string(), "Missing configuration of electron.max_iso");

        let garbled = DEFAULT_CONFIG.replacen("2.4", "2.4.1", 1);
        let err = Configuration::parse(&garbled).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not parse configuration of muon.max_abs_eta"
        );

        let unknown = DEFAULT_CONFIG.replacen("FourMuons,", "FourTaus,", 1);
        let err = Configuration::parse(&unknown).unwrap_err();
        assert_eq!(err.to_string(), "Could not parse configuration of final_states");
        assert_eq!(
            err.root_cause().to_string(),
            "unknown final state --> FourTaus"
        );
    }

    #[test]
    fn insane_configurations_are_rejected() {
        let inverted = DEFAULT_CONFIG.replacen("40        Z close", "130       Z close", 1);
        assert!(Configuration::parse(&inverted).is_err());

        let mut config = Configuration::default();
        config.final_states.clear();
        assert!(config.check().is_err());
    }

    #[test]
    fn missing_file() {
        let err = Configuration::load("/nonexistent/quatre_leptons.cfg").unwrap_err();
        assert!(err.to_string().starts_with("Could not open configuration file"));
    }
}
