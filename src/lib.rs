pub mod config;
pub mod logging;

pub mod domain {
    pub mod entities {
        pub mod claim;
        pub mod table;
    }
    pub mod table {
        pub mod columns;
        pub mod compare;
        pub mod filter;
        pub mod paginate;
        pub mod pipeline;
        pub mod query;
        pub mod sort;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod location;
        pub mod repo;
    }
    pub mod services {
        pub mod import_service;
        pub mod query_service;
        pub mod table_service;
    }
}

pub mod infra {
    pub mod import {
        pub mod csv;
        pub mod xlsx;
    }
    pub mod location {
        pub mod memory;
    }
    pub mod source {
        pub mod generated;
    }
    pub mod sqlite {
        pub mod queries;
        pub mod repo;
        pub mod schema;
    }
}

pub mod ui {
    pub mod debounce;
    pub mod styles;
    #[cfg(feature = "desktop")]
    pub mod state {
        pub mod app_state;
    }
}

#[cfg(feature = "desktop")]
pub mod platform {
    pub mod desktop {
        pub mod blocking;
    }
}

#[cfg(feature = "desktop")]
pub mod app;

#[cfg(test)]
mod tests;
