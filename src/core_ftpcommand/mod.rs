// Here's the list of the FTP commands implemented
pub mod auth;
pub mod cdup;
pub mod clnt;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod list;
pub mod mdtm;
pub mod mkd;
pub mod mlst;
pub mod mode;
pub mod noop;
pub mod opts;
pub mod pass;
pub mod pbsz;
pub mod prot;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod site;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Dispatch, parsing and replies
pub mod ftpcommand;
pub mod handlers;
pub mod outcome;
pub mod reply;

// The utils and common functions are here
pub mod utils;
