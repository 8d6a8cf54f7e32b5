pub mod airport;
pub mod brief;
pub mod flight;
pub mod hazard;
pub mod list;
pub mod named_location;
pub mod task;
pub mod token;
pub mod user;

pub use airport::{Airport, AirportPatch, AirportPayload, NewAirport};
pub use brief::{Brief, BriefDetail, BriefPatch, BriefPayload, NewBrief};
pub use flight::{Flight, FlightDetail, FlightPatch, FlightPayload, NewFlight};
pub use hazard::{Hazard, HazardPatch, HazardPayload, NewHazard};
pub use list::{List, ListDetail, ListPatch, ListPayload, NewList};
pub use named_location::{NamedLocation, NamedLocationPatch, NamedLocationPayload, NewNamedLocation};
pub use task::{NewTask, Task, TaskPatch, TaskPayload};
pub use token::AuthToken;
pub use user::{
    AuthSession, LoginPayload, NewUser, ProfilePayload, Signup, SignupPayload, User, UserPatch,
    UserProfile,
};
