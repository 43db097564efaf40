pub mod bill_list;

pub use bill_list::{
    BillListRequest, BillListResponse, CODE_NO_DATA, CODE_SUCCESS, CODE_VALIDATION_FAILED,
};
