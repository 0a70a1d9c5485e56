use crate::identity::Role;

use super::route::{RouteDescriptor, CATCH_ALL};

pub const LOGIN: &str = "/login";

const EVERYONE: &[Role] = &[Role::Buyer, Role::Seller, Role::Admin];
const SHOPPERS: &[Role] = &[Role::Buyer, Role::Seller];

/// The client's page table in match order. The catch-all must stay last.
pub const DEFAULT_ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor::redirect("Root", "/", LOGIN),
    RouteDescriptor::public("Login", LOGIN),
    RouteDescriptor::public("Register", "/register"),
    RouteDescriptor::guarded("IdentityVerify", "/verify-identity", EVERYONE),
    RouteDescriptor::guarded("Appeal", "/appeal", EVERYONE),
    RouteDescriptor::guarded("BuyerHome", "/buyer/home", SHOPPERS),
    RouteDescriptor::guarded("BuyerOrder", "/buyer/order", SHOPPERS),
    RouteDescriptor::guarded("BuyerCollect", "/buyer/collect", SHOPPERS),
    RouteDescriptor::guarded("BuyerCart", "/buyer/cart", SHOPPERS),
    RouteDescriptor::guarded("BuyerEvaluate", "/buyer/evaluate", SHOPPERS),
    RouteDescriptor::guarded("BuyerComplaint", "/buyer/complaint", SHOPPERS),
    RouteDescriptor::guarded("SellerDetail", "/seller/detail/:name", EVERYONE),
    RouteDescriptor::guarded("Chat", "/chat", EVERYONE),
    RouteDescriptor::guarded("MessageCenter", "/messages", EVERYONE),
    RouteDescriptor::guarded("BuyerProfile", "/buyer/profile", SHOPPERS),
    RouteDescriptor::guarded("BookDetail", "/book/:id", EVERYONE),
    // buyers reach the seller center once their application is approved
    RouteDescriptor::guarded("SellerCenter", "/seller/center", &[Role::Seller, Role::Buyer]),
    RouteDescriptor::guarded("SellerApply", "/seller/apply", &[Role::Buyer]),
    RouteDescriptor::guarded("PublishBook", "/publish", &[Role::Seller]),
    RouteDescriptor::guarded("AdminDashboard", "/admin/dashboard", &[Role::Admin]),
    RouteDescriptor::guarded("AdminAppealList", "/admin/appeals", &[Role::Admin]),
    RouteDescriptor::redirect("NotFound", CATCH_ALL, LOGIN),
];
