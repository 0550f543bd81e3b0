use popvis_vis::layout::VisLayout;

use crate::cli::PathExt;
use crate::cli::ViewArgs;
use crate::data::load_views;
use crate::error::CliError;

pub(crate) fn view(args: ViewArgs) -> Result<(), CliError> {
    let output_path = args.output_path.or_current_dir()?;
    let views = load_views(&args.source)?;

    let vis = VisLayout::init(&output_path)?;
    vis.generate_report(views)?;

    println!(
        "popvis generated the dashboard in: `{}`",
        vis.root_path().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Source;
    use std::fs;

    const SOURCE: &str = "year,sex,ethnicity,population
1980,both,overall,13000000
1980,male,overall,6600000
1980,female,overall,6400000
1980,both,chinese,4300000
1980,both,indian,1100000
";

    #[test]
    fn generate_dashboard_into_output_dir() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        let data = dir.path().join("population.csv");
        fs::write(&data, SOURCE)?;

        let args = ViewArgs {
            source: Source {
                data: Some(data),
                url: None,
            },
            output_path: Some(dir.path().to_path_buf()),
        };
        view(args)?;

        let root = dir.path().join("popvis");
        for file_name in ["index.html", "by-sex.html", "by-ethnicity.html", "404.html"] {
            assert!(root.join(file_name).is_file(), "{file_name} is missing");
        }

        let by_ethnicity = fs::read_to_string(root.join("by-ethnicity.html"))?;
        assert!(by_ethnicity.contains("Population Distribution by Ethnicity in 1980"));

        Ok(())
    }
}
