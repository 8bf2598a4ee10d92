use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Import an indicator into a new collection",
        long_about = "Download all country values of the indicator for 2012-2017 and store them as a collection. A previous collection for the same indicator is replaced."
    )]
    Import {
        #[arg(
            long = "indicator-id",
            value_name = "ID",
            help = "World Bank indicator id, e.g. NY.GDP.MKTP.CD",
            required = true
        )]
        indicator_id: String,
    },
    #[command(
        about = "List stored collections",
        long_about = "Print every stored collection as JSON, optionally sorted with a comma-separated list of [+|-]field terms."
    )]
    List {
        #[arg(
            long = "order-by",
            value_name = "TERMS",
            help = "Sort terms over id, indicator_id, creation_time, indicator_value"
        )]
        order_by: Option<String>,
    },
    #[command(
        about = "Delete a collection",
        long_about = "Remove a collection and all its country values. Deleting an unknown id succeeds."
    )]
    Delete {
        #[arg(long, value_name = "ID", help = "Collection id", required = true)]
        id: i64,
    },
}
