pub mod macros;

pub mod bambora;
pub use self::bambora::Bambora;

pub mod bamboraapac;
pub use self::bamboraapac::Bamboraapac;

pub mod nmi;
pub use self::nmi::Nmi;

pub mod bogus;
pub use self::bogus::{Bogus, BogusGateway};
